//! Rendering compiled variants into one C source artifact
//!
//! Each variant becomes a `static const uint32_t NAME[] = { ... };` array
//! holding the numeric SPIR-V words, with the assembly listing embedded in a
//! comment block above the data for human inspection.

/// One compiled shader variant, immutable once pushed.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Array name derived from the combination's identifier
    pub name: String,
    /// Assembly-mode compiler output, embedded verbatim in the comment
    pub assembly: String,
    /// Binary-mode compiler output (comma-separated numeric words)
    pub code: String,
}

/// Append-only accumulator of variants, rendered in push order.
///
/// Ordering is part of the contract: downstream code may reference the
/// generated arrays positionally.
#[derive(Debug, Default)]
pub struct Corpus {
    variants: Vec<Variant>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Render the whole corpus: one declaration block per variant, joined
    /// by a blank line, in push order.
    pub fn render(&self) -> String {
        let blocks: Vec<String> = self
            .variants
            .iter()
            .map(|v| {
                format!(
                    "static const uint32_t {}[] = {{\n/*\n{}*/\n{}}};\n",
                    v.name, v.assembly, v.code
                )
            })
            .collect();
        blocks.join("\n")
    }
}
