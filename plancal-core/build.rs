use flate2::read::GzDecoder;
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tar::Archive;

const PDFIUM_BASE_URL: &str =
    "https://github.com/bblanchon/pdfium-binaries/releases/download/chromium/6721";

/// Set to `1` to fetch a prebuilt pdfium into `<workspace>/lib`.
const DOWNLOAD_ENV_NAME: &str = "PLANCAL_DOWNLOAD_PDFIUM";

fn pdfium_archive_name() -> Result<String, String> {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    let platform = match target_os.as_str() {
        "macos" => "mac",
        "linux" => "linux",
        "android" => "android",
        "windows" => "win",
        _ => return Err(format!("Unsupported platform: {target_os} on {target_arch}")),
    };
    let arch = match target_arch.as_str() {
        "aarch64" => "arm64",
        "x86_64" => "x64",
        "arm" => "arm",
        "x86" => "x86",
        _ => return Err(format!("Unsupported platform: {target_os} on {target_arch}")),
    };

    Ok(format!("pdfium-{platform}-{arch}.tgz"))
}

fn workspace_lib_dir() -> Result<PathBuf, Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let workspace_dir = manifest_dir
        .parent()
        .ok_or("CARGO_MANIFEST_DIR has no parent directory")?;
    Ok(workspace_dir.join("lib"))
}

fn download(archive_name: &str, tgz_path: &Path) -> Result<(), Box<dyn Error>> {
    let url = format!("{PDFIUM_BASE_URL}/{archive_name}");
    println!("Downloading PDFium from {url}...");

    let response = reqwest::blocking::get(&url)?;
    if !response.status().is_success() {
        return Err(format!("Failed to download {url}: HTTP status {}", response.status()).into());
    }
    fs::write(tgz_path, response.bytes()?)?;
    Ok(())
}

fn unpack(tgz_path: &Path, into: &Path) -> Result<(), Box<dyn Error>> {
    let mut archive = Archive::new(GzDecoder::new(File::open(tgz_path)?));
    archive.unpack(into)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed={DOWNLOAD_ENV_NAME}");

    if env::var(DOWNLOAD_ENV_NAME).as_deref() != Ok("1") {
        return Ok(());
    }

    let lib_dir = workspace_lib_dir()?;
    if lib_dir.exists() && fs::read_dir(&lib_dir)?.next().is_some() {
        println!("PDFium library already exists in {}", lib_dir.display());
        return Ok(());
    }

    let archive_name = pdfium_archive_name()?;
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let pdfium_dir = out_dir.join("pdfium");
    fs::create_dir_all(&pdfium_dir)?;

    let tgz_path = out_dir.join("pdfium.tgz");
    download(&archive_name, &tgz_path)?;
    unpack(&tgz_path, &pdfium_dir)?;

    fs::remove_dir_all(&lib_dir).ok();
    fs::rename(pdfium_dir.join("lib"), &lib_dir)?;
    println!("cargo:warning=PDFium installed into {}", lib_dir.display());

    Ok(())
}
