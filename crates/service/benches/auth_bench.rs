use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use configs::HashingConfig;
use service::auth::hashing::SecretHasher;
use service::auth::repository::mock::MockAccountRepository;
use service::auth::service::AuthService;
use service::auth::domain::{RegisterInput, LoginInput};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAccountRepository::default());
    // production work factor, so the numbers say something about real login latency
    let hasher = SecretHasher::new(&HashingConfig::default()).unwrap();
    let svc = AuthService::new(repo, hasher);

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(RegisterInput { name: "Bench".into(), email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            rt.block_on(svc.authenticate(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();
        });
    });

    c.bench_function("auth_login_unknown_email", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.authenticate(LoginInput { email: "ghost@example.com".into(), password: "Benchmark1".into() }));
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
