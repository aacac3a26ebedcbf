//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use termdesk_console::dispatcher::Dispatcher;
use termdesk_console::history::{Direction, HistoryBuffer};
use termdesk_console::session::editor::{LineEditor, Step};
use termdesk_console::tokenizer::tokenize;
use termdesk_console::{CommandOutput, CommandRegistry};
use tokio::runtime::Runtime;

/// Benchmark feeding a full command line through the line editor
fn bench_editor_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor_feed");
    for len in [8usize, 64, 512] {
        let mut input = vec![b'x'; len];
        input.push(b'\r');

        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| {
                let mut editor = LineEditor::new();
                for &byte in input {
                    if let Ok(Step::Line(line)) = editor.feed(black_box(byte)) {
                        return line;
                    }
                }
                unreachable!("line never completed")
            });
        });
    }
    group.finish();
}

/// Benchmark tokenizing lines with and without quoted spans
fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_plain", |b| {
        b.iter(|| tokenize(black_box("set cache.size 4096 now")));
    });

    c.bench_function("tokenize_quoted", |b| {
        b.iter(|| tokenize(black_box("note \"cache was flushed\" by \"ops team\"")));
    });
}

/// Benchmark history push and recall on a wrapped ring
fn bench_history(c: &mut Criterion) {
    let mut history = HistoryBuffer::new();
    for i in 0..250 {
        history.push(&format!("command {}", i));
    }

    c.bench_function("history_push", |b| {
        b.iter(|| history.push(black_box("status")));
    });

    c.bench_function("history_recall", |b| {
        b.iter(|| {
            history.recall(black_box(Direction::Up));
            history.recall(black_box(Direction::Down))
        });
    });
}

/// Benchmark dispatching a registered command
fn bench_dispatch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut registry = CommandRegistry::new();
    registry
        .register("status", 1, 1, true, |_: &[String]| CommandOutput::ok("green"))
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry)));
    let tokens = vec!["status".to_string()];
    let empty: Vec<String> = Vec::new();

    c.bench_function("dispatch_command", |b| {
        b.to_async(&rt)
            .iter(|| async { dispatcher.dispatch(black_box(&tokens)).await });
    });

    c.bench_function("dispatch_replay", |b| {
        b.to_async(&rt)
            .iter(|| async { dispatcher.dispatch(black_box(&empty)).await });
    });
}

criterion_group!(
    benches,
    bench_editor_feed,
    bench_tokenize,
    bench_history,
    bench_dispatch,
);

criterion_main!(benches);
