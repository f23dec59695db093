// Build script for gRPC proto generation

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Both the content server and the sitemap client are built from the same proto.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/content.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/content.proto");

    Ok(())
}
