use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netedit::prelude::*;
use uuid::Uuid;

fn empty_project() -> (Project, Uuid) {
    let mut project = Project::new();
    let schematic = project.add_schematic(Schematic::new("Bench", &EditorOptions::default()));
    (project, schematic)
}

fn bench_place_auto_named(c: &mut Criterion) {
    c.bench_function("place_100_auto_named", |b| {
        b.iter(|| {
            let (mut project, schematic) = empty_project();
            let mut stack = UndoStack::default();
            for i in 0..100 {
                let cmd = PlaceNetPointCommand::new(
                    schematic,
                    Point::new(black_box(i * 2_540_000), 0),
                    "default",
                    "",
                );
                stack.exec_cmd(&mut project, Box::new(cmd)).unwrap();
            }
            project
        });
    });
}

fn bench_place_and_undo(c: &mut Criterion) {
    c.bench_function("place_undo_redo", |b| {
        b.iter(|| {
            let (mut project, schematic) = empty_project();
            let mut stack = UndoStack::default();
            for i in 0..50 {
                let cmd = PlaceNetPointCommand::new(
                    schematic,
                    Point::new(0, black_box(i * 2_540_000)),
                    "default",
                    "GND",
                );
                stack.exec_cmd(&mut project, Box::new(cmd)).unwrap();
            }
            while stack.undo(&mut project).unwrap() {}
            while stack.redo(&mut project).unwrap() {}
            project
        });
    });
}

criterion_group!(benches, bench_place_auto_named, bench_place_and_undo);
criterion_main!(benches);
