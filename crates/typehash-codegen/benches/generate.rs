use criterion::{black_box, criterion_group, criterion_main, Criterion};

use typehash_codegen::{generate, inject, CodegenConfig, RegionMarkers};
use typehash_core::TypeSchema;

fn delegation_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type(
            "Invocation",
            [("transaction", "Transaction"), ("authority", "SignedDelegation[]")],
        )
        .with_type(
            "Invocations",
            [("batch", "Invocation[]"), ("replayProtection", "ReplayProtection")],
        )
        .with_type("SignedInvocation", [("invocations", "Invocations"), ("signature", "bytes")])
        .with_type("Transaction", [("to", "address"), ("gasLimit", "uint256"), ("data", "bytes")])
        .with_type("ReplayProtection", [("nonce", "uint"), ("queue", "uint")])
        .with_type(
            "Delegation",
            [("delegate", "address"), ("authority", "bytes32"), ("caveats", "Caveat[]")],
        )
        .with_type("Caveat", [("enforcer", "address"), ("terms", "bytes")])
        .with_type("SignedDelegation", [("delegation", "Delegation"), ("signature", "bytes")])
}

/// `T0`..`T{n-1}`, each referencing every earlier type.
fn chain_schema(n: usize) -> TypeSchema {
    let mut schema = TypeSchema::new().with_type("T0", [("value", "uint256")]);
    for i in 1..n {
        let names: Vec<(String, String)> = (0..i)
            .map(|j| {
                let ty = if j % 2 == 0 { format!("T{j}") } else { format!("T{j}[]") };
                (format!("f{j}"), ty)
            })
            .collect();
        let fields: Vec<(&str, &str)> =
            names.iter().map(|(f, t)| (f.as_str(), t.as_str())).collect();
        schema = schema.with_type(&format!("T{i}"), fields);
    }
    schema
}

fn bench_generate(c: &mut Criterion) {
    let config = CodegenConfig::default();
    let delegation = delegation_schema();
    let chain = chain_schema(10);

    c.bench_function("generate_delegation", |b| {
        b.iter(|| generate(black_box(&delegation), &config).expect("generate"))
    });
    c.bench_function("generate_chain_10", |b| {
        b.iter(|| generate(black_box(&chain), &config).expect("generate"))
    });
}

fn bench_inject(c: &mut Criterion) {
    let config = CodegenConfig::default();
    let code = generate(&delegation_schema(), &config).expect("generate");
    let (setup, body) = (code.setup_block(), code.body_block());
    let m = RegionMarkers::default();
    let filler = "  function noop() public pure {}\n".repeat(500);
    let text = format!(
        "contract D {{\n{filler}{}\n{}\n{filler}{}\n{}\n{filler}}}\n",
        m.setup_begin, m.setup_end, m.body_begin, m.body_end
    );

    c.bench_function("inject_large_contract", |b| {
        b.iter(|| inject(black_box(&text), &setup, &body, &m).expect("inject"))
    });
}

criterion_group!(benches, bench_generate, bench_inject);
criterion_main!(benches);
