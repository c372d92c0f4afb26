fn main() {
    // tauri-build sets `mobile`/`desktop`; declare them for core-only builds too.
    println!("cargo::rustc-check-cfg=cfg(mobile)");
    println!("cargo::rustc-check-cfg=cfg(desktop)");

    #[cfg(feature = "shell")]
    tauri_build::build()
}
