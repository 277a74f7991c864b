//! Criterion microbenchmarks for polyglot-api hot paths.
//!
//! Run with:
//!   cargo bench -p polyglot-api
//!
//! HTML reports are written to `target/criterion/`.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use futures_util::stream;
use polyglot_api::{auth, export};
use polyglot_common::models::{ExportRecord, LocaleDraft, TranslationDraft};
use polyglot_db::{
    Database,
    repository::{locales, translations},
};
use tokio::sync::mpsc;

fn record(i: usize, content: &str) -> ExportRecord {
    ExportRecord {
        key: format!("page.section.key_{i}"),
        locale: Some("en".into()),
        content: content.into(),
        tags: vec!["web".into(), "mobile".into()],
    }
}

// ── Export encoding ───────────────────────────────────────────────────────────

/// Encode a single record into the array buffer.
fn bench_writer_push(c: &mut Criterion) {
    let rec = record(1, "Welcome back! ¡Bienvenido de nuevo! おかえりなさい");

    c.bench_function("export/writer_push", |b| {
        b.iter(|| {
            let mut writer = export::ArrayWriter::new();
            writer.push(black_box(&rec)).unwrap();
            writer.finish()
        })
    });
}

/// Full producer run over in-memory records at different export sizes.
fn bench_write_array_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("export/write_array");

    for rows in [100usize, 1_000, 10_000] {
        let records: Vec<ExportRecord> = (0..rows).map(|i| record(i, "Hello, world!")).collect();

        group.bench_with_input(BenchmarkId::from_parameter(rows), &records, |b, recs| {
            b.iter(|| {
                rt.block_on(async {
                    let (tx, mut rx) = mpsc::channel(export::CHANNEL_CAPACITY);
                    let drain = tokio::spawn(async move {
                        let mut bytes = 0usize;
                        while let Some(chunk) = rx.recv().await {
                            bytes += chunk.unwrap().len();
                        }
                        bytes
                    });
                    let items = recs.iter().cloned().map(Ok::<_, sqlx::Error>);
                    export::write_array(stream::iter(items), &tx).await;
                    drop(tx);
                    drain.await.unwrap()
                })
            })
        });
    }

    group.finish();
}

/// Cursor + encoder against a seeded in-memory SQLite database.
fn bench_export_from_database(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let db = rt.block_on(async {
        let db = Database::in_memory().await.unwrap();
        let en = locales::create_locale(
            &db.pool,
            &LocaleDraft {
                name: "English".into(),
                short_code: "en".into(),
            },
        )
        .await
        .unwrap();
        for i in 0..1_000 {
            let draft = TranslationDraft {
                key: format!("page.key_{i}"),
                locale_id: en.id,
                content: "Hello, world!".into(),
                tags: vec!["web".into()],
            };
            translations::create_translation(&db.pool, &draft).await.unwrap();
        }
        db
    });

    c.bench_function("export/database_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                let (tx, mut rx) = mpsc::channel(export::CHANNEL_CAPACITY);
                let drain = tokio::spawn(async move { while rx.recv().await.is_some() {} });
                export::write_array(translations::export_stream(&db.pool), &tx).await;
                drop(tx);
                drain.await.unwrap();
            })
        })
    });
}

// ── Credentials ───────────────────────────────────────────────────────────────

fn bench_token_generate(c: &mut Criterion) {
    c.bench_function("auth/token_generate", |b| b.iter(auth::generate_token));
}

fn bench_token_hash(c: &mut Criterion) {
    let token = auth::generate_token();
    c.bench_function("auth/token_sha256", |b| {
        b.iter(|| auth::hash_token(black_box(&token)))
    });
}

fn bench_argon2_hash(c: &mut Criterion) {
    c.bench_function("auth/argon2_hash", |b| {
        b.iter(|| auth::hash_password(black_box("hunter2-password-bench")).unwrap())
    });
}

fn bench_argon2_verify(c: &mut Criterion) {
    let hash = auth::hash_password("hunter2-password-bench").unwrap();

    c.bench_function("auth/argon2_verify", |b| {
        b.iter(|| auth::verify_password(black_box("hunter2-password-bench"), &hash).unwrap())
    });
}

// ── criterion entrypoints ─────────────────────────────────────────────────────

criterion_group!(
    exporting,
    bench_writer_push,
    bench_write_array_scaling,
    bench_export_from_database,
);

criterion_group!(
    credentials,
    bench_token_generate,
    bench_token_hash,
    bench_argon2_hash,
    bench_argon2_verify,
);

criterion_main!(exporting, credentials);
