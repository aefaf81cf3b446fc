use std::path::Path;

const SHADERS: &[&str] = &["src/kernel/shader.wgsl"];

fn main() {
    for path in SHADERS {
        println!("cargo:rerun-if-changed={path}");

        let source = std::fs::read_to_string(Path::new(path))
            .unwrap_or_else(|e| panic!("failed to read {path}: {e}"));

        let module = naga::front::wgsl::parse_str(&source)
            .unwrap_or_else(|e| panic!("{path}: {}", e.emit_to_string(&source)));

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{path}: {}", e.emit_to_string(&source)));
    }
}
