//! Build script — locate the CUDA toolkit on platforms that link at
//! build time.  Linux resolves libcudart/libnvjpeg at runtime via
//! `dlopen`, so nothing is linked there.
//!
//! Non-Linux environment variables:
//!   CUDA_PATH — CUDA toolkit root (set by the NVIDIA installer)

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=CUDA_PATH");
    println!("cargo:rerun-if-changed=build.rs");

    if cfg!(target_os = "linux") {
        return;
    }

    let Ok(cuda_path) = env::var("CUDA_PATH") else {
        panic!(
            "CUDA_PATH env var must be set (e.g., C:\\Program Files\\NVIDIA GPU Computing Toolkit\\CUDA\\v12.x)"
        );
    };
    let cuda_root = PathBuf::from(cuda_path);

    let cuda_lib_dir = if cfg!(target_os = "windows") {
        cuda_root.join("lib").join("x64")
    } else {
        cuda_root.join("lib")
    };
    if !cuda_lib_dir.exists() {
        panic!(
            "CRITICAL: CUDA library directory not found at {}",
            cuda_lib_dir.display()
        );
    }
    println!("cargo:rustc-link-search=native={}", cuda_lib_dir.display());
    println!("cargo:rustc-link-lib=dylib=cudart");
    println!("cargo:rustc-link-lib=dylib=nvjpeg");
}
