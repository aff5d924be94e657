//! This build script compiles the editor's shaders from `SHADER_SRC` into SPIR-V representations
//! in `SPIRV_OUT`. Nothing needs to be compiled when the `editor` feature is disabled.

#[cfg(feature = "editor")]
const SHADER_SRC: &str = "assets/shaders";
#[cfg(feature = "editor")]
const SPIRV_OUT: &str = "assets/generated/spirv";

#[cfg(feature = "editor")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use glsl_to_spirv::ShaderType;
    use std::io::Read;

    println!("cargo:rerun-if-changed={}", SHADER_SRC);

    std::fs::create_dir_all(SPIRV_OUT)?;

    let shader_src_path = std::path::Path::new(SHADER_SRC);
    for shader_file in ["knobs.vert", "knobs.frag"].iter() {
        let shader_path = shader_src_path.join(shader_file);

        let shader_type = match shader_path.extension().and_then(|ext| ext.to_str()) {
            Some("vert") => ShaderType::Vertex,
            Some("frag") => ShaderType::Fragment,
            _ => return Err(format!("Unrecognized shader type for {:?}", shader_path).into()),
        };

        let source = std::fs::read_to_string(&shader_path)?;
        let mut compiled_file = glsl_to_spirv::compile(&source, shader_type)?;

        let mut compiled_bytes = Vec::new();
        compiled_file.read_to_end(&mut compiled_bytes)?;

        let out_path = format!("{}/{}.spv", SPIRV_OUT, shader_file);

        std::fs::write(&out_path, &compiled_bytes)?;
    }

    Ok(())
}

#[cfg(not(feature = "editor"))]
fn main() {}
