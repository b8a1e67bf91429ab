use criterion::{Criterion, criterion_group, criterion_main};
use richspan_engine::{Cmd, Selection, Session, StyleOptions, StyleSet, export_markup, import_markup};

fn generate_markup(paragraphs: usize) -> String {
    let base = concat!(
        "<b>Bold lead</b> with <i>italic <u>and underlined</u></i> words, ",
        r#"<span style="font-size:18px;">a larger <span style="color:#336699;">blue</span> run</span> "#,
        r#"and a <a href="https://example.com/page" alt="">link</a>.<br>"#,
    );
    base.repeat(paragraphs)
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");
    group.sample_size(10);

    let styles = StyleSet::default();
    let controllers = styles.markup_controllers();
    let source = generate_markup(200);

    group.bench_function("import", |b| {
        b.iter(|| {
            let text = import_markup(std::hint::black_box(&source), &controllers).unwrap();
            std::hint::black_box(text);
        });
    });

    let text = import_markup(&source, &controllers).unwrap();
    group.bench_function("export", |b| {
        b.iter(|| {
            let out = export_markup(std::hint::black_box(&text), &controllers);
            std::hint::black_box(out);
        });
    });

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let source = generate_markup(50);
    group.bench_function("type_100_chars", |b| {
        b.iter(|| {
            let mut session = Session::from_markup(&source, &StyleOptions::default()).unwrap();
            let mut at = 5;
            session.set_selection(Selection::caret(at));
            for _ in 0..100 {
                session
                    .apply(Cmd::InsertText {
                        at,
                        text: "x".to_string(),
                    })
                    .unwrap();
                at += 1;
            }
            std::hint::black_box(session.version());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_import, bench_typing);
criterion_main!(benches);
