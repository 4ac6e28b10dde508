//! shader-permute - SPIR-V permutation corpus generator
//!
//! Iterates `#define` choices in the same source shader to generate a
//! SPIR-V corpus. Each `--define` lists a macro and its choices; the full
//! cross product of choices is compiled with glslc and all variants are
//! written to one C source file.
//!
//! # Usage
//!
//! ```bash
//! shader-permute matmul.comp -o matmul_spirv.inc \
//!     --glslc /usr/bin/glslc \
//!     --define 'TILE_K=[4|8]' \
//!     --define '{TILE_M,TILE_N}=[{8,8}|{16,8}]' \
//!     --glslc-arg=--target-env=vulkan1.1
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use shader_permute::compiler::Glslc;
use shader_permute::spec::DefineSpec;

/// Generate a SPIR-V corpus from #define permutations of a shader source
#[derive(Parser)]
#[command(name = "shader-permute")]
#[command(about = "Generate a SPIR-V corpus from #define permutations")]
#[command(version)]
struct Cli {
    /// Input shader source file
    #[arg(value_name = "shader-source-file")]
    infile: PathBuf,

    /// Output SPIR-V corpus file
    #[arg(short, long, value_name = "spirv-output-file")]
    outfile: PathBuf,

    /// A #define and its choices, e.g. 'FOO=[BAR|BAZ]' or '{A,B}=[{1,2}|{3,4}]'
    #[arg(long = "define", value_name = "macro-choices")]
    defines: Vec<String>,

    /// Path to the glslc executable
    #[arg(long, value_name = "glslc-executable")]
    glslc: PathBuf,

    /// Additional argument to pass through to glslc (repeatable)
    #[arg(long = "glslc-arg", value_name = "glslc-arg")]
    glslc_args: Vec<String>,

    /// Compile without optimization (-O)
    #[arg(long)]
    no_opt: bool,

    /// Print each glslc command line before running it
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validate the environment before doing any work
    let glslc = Glslc::locate(&cli.glslc)?;
    if !cli.infile.is_file() {
        bail!("input shader source not found: {}", cli.infile.display());
    }

    let specs: Vec<DefineSpec> = cli
        .defines
        .iter()
        .map(|d| DefineSpec::parse(d))
        .collect::<Result<_, _>>()?;

    let compiler = Glslc {
        glslc,
        source: cli.infile,
        optimize: !cli.no_opt,
        extra_args: cli.glslc_args,
        verbose: cli.verbose,
    };

    let corpus = shader_permute::generate_corpus(&specs, &compiler)?;

    fs::write(&cli.outfile, corpus)
        .with_context(|| format!("failed to write {}", cli.outfile.display()))?;

    Ok(())
}
