//! SPIR-V permutation corpus generation
//!
//! Takes a list of `#define` macros with their choices, enumerates every
//! production of those choices, invokes the shader compiler for each one in
//! both numeric and assembly form, and renders all results into a single C
//! source file of `static const uint32_t` arrays.

pub mod compiler;
pub mod corpus;
pub mod permute;
pub mod spec;

use compiler::{Compiler, InvocationError, SpirvMode};
use corpus::{Corpus, Variant};
use spec::DefineSpec;

/// Compile every combination of the given specs and render the corpus.
///
/// Combinations are compiled sequentially in enumeration order, binary mode
/// first, then assembly. The first failing invocation aborts the run with
/// nothing rendered: a broken variant is an authoring error, and a partial
/// corpus must never look like a complete one.
pub fn generate_corpus(
    specs: &[DefineSpec],
    compiler: &dyn Compiler,
) -> Result<String, InvocationError> {
    let mut corpus = Corpus::new();

    for combination in permute::permutations(specs) {
        let defines = combination.define_flags();
        let code = compiler.compile(&defines, SpirvMode::Binary)?;
        let assembly = compiler.compile(&defines, SpirvMode::Assembly)?;
        corpus.push(Variant {
            name: combination.identifier(),
            assembly,
            code,
        });
    }

    Ok(corpus.render())
}
