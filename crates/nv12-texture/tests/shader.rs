use cap_nv12_texture::kernel;

fn parse() -> naga::Module {
    naga::front::wgsl::parse_str(kernel::SHADER_SOURCE)
        .unwrap_or_else(|e| panic!("{}", e.emit_to_string(kernel::SHADER_SOURCE)))
}

#[test]
fn kernel_validates() {
    let module = parse();
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{}", e.emit_to_string(kernel::SHADER_SOURCE)));
}

#[test]
fn entry_point_matches_dispatch_geometry() {
    let module = parse();

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == kernel::ENTRY_POINT)
        .expect("entry point present");

    assert_eq!(entry.stage, naga::ShaderStage::Compute);
    assert_eq!(
        entry.workgroup_size,
        [kernel::WORKGROUP_SIZE, kernel::WORKGROUP_SIZE, 1]
    );
}

#[test]
fn bindings_use_fixed_slots() {
    let module = parse();

    let mut bindings: Vec<(String, u32)> = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            assert_eq!(binding.group, 0);
            Some((var.name.clone()?, binding.binding))
        })
        .collect();
    bindings.sort_by_key(|(_, slot)| *slot);

    assert_eq!(
        bindings,
        vec![
            ("y_texture".to_string(), kernel::LUMA_BINDING),
            ("uv_texture".to_string(), kernel::CHROMA_BINDING),
            ("output".to_string(), kernel::OUTPUT_BINDING),
        ]
    );
}
