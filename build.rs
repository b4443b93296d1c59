#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    let mut res = WindowsResource::new();
    res.set("FileDescription", "rAttendance CLI")
        .set("ProductName", "rAttendance")
        .set("OriginalFilename", "rattendance.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"));

    if let Err(e) = res.compile() {
        println!("cargo:warning=Failed to embed version resource: {}", e);
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {}
