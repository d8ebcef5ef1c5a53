pub fn run() -> anyhow::Result<()> {
    println!("flagwise {}", env!("CARGO_PKG_VERSION"));
    println!("Feature flag decisions from local or CDN datafiles");
    Ok(())
}
