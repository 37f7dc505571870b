// SPDX-License-Identifier: Apache-2.0

#[test]
fn layout_modules_do_not_pull_io_or_runtime_deps() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let pure_modules = [
        "src/geometry.rs",
        "src/validator.rs",
        "src/planner.rs",
        "src/render.rs",
        "src/suggest.rs",
        "src/measure.rs",
        "src/intake.rs",
    ];
    let forbidden = ["rusqlite", "tokio", "std::fs", "std::time", "tracing", "rand"];

    for module in pure_modules {
        let path = root.join(module);
        let text = std::fs::read_to_string(&path).expect("read pure module");
        for needle in forbidden {
            assert!(
                !text.contains(needle),
                "forbidden import `{}` in {}",
                needle,
                module
            );
        }
    }
}

#[test]
fn layout_crate_cargo_has_no_server_or_store_dependency() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_toml = std::fs::read_to_string(root.join("Cargo.toml")).expect("read Cargo.toml");
    for forbidden in ["axum", "sooru-store", "sooru-server"] {
        assert!(
            !cargo_toml.contains(forbidden),
            "forbidden dependency in layout crate: {forbidden}"
        );
    }
}
