//! Cartesian-product enumeration of macro choices
//!
//! Walks every production of the parsed define specs lazily, yielding one
//! [`Combination`] at a time. The iterator holds only a per-spec choice
//! index, so memory stays proportional to the number of specs no matter how
//! large the product gets.

use crate::spec::DefineSpec;

/// One macro bound to one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

/// A fully-resolved assignment of values to every declared macro.
///
/// Bindings are ordered: linked groups expand in macro-group order, specs
/// concatenate in spec order. Downstream names and flags derive from this
/// order, so it is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub bindings: Vec<Binding>,
}

impl Combination {
    /// Variable name for this combination: `MACRO_VALUE` pairs joined by `_`.
    ///
    /// Distinct combinations get distinct names as long as macro and value
    /// names don't themselves contain `_` collisions (caller's
    /// responsibility). With no macros to vary there is exactly one
    /// combination, named `DEFAULT` so the generated array stays legal C.
    pub fn identifier(&self) -> String {
        if self.bindings.is_empty() {
            return "DEFAULT".to_string();
        }
        self.bindings
            .iter()
            .map(|b| format!("{}_{}", b.name, b.value))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// `-DMACRO=VALUE` compiler flags, one per binding, in binding order.
    pub fn define_flags(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| format!("-D{}={}", b.name, b.value))
            .collect()
    }
}

/// Lazy iterator over every production of the given specs.
///
/// The rightmost spec varies fastest. A fresh iterator always replays the
/// same sequence for the same specs.
pub struct Permutations<'a> {
    specs: &'a [DefineSpec],
    indices: Vec<usize>,
    done: bool,
}

/// Enumerate all combinations of the given specs in product order.
pub fn permutations(specs: &[DefineSpec]) -> Permutations<'_> {
    Permutations {
        specs,
        indices: vec![0; specs.len()],
        // A spec with no choices empties the whole product. The parser
        // rejects such specs, but handle it rather than panic on indexing.
        done: specs.iter().any(|s| s.choice_count() == 0),
    }
}

impl Iterator for Permutations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.done {
            return None;
        }

        let mut bindings = Vec::new();
        for (spec, &choice) in self.specs.iter().zip(&self.indices) {
            let values = &spec.choices()[choice];
            for (name, value) in spec.macros().iter().zip(values) {
                bindings.push(Binding {
                    name: name.clone(),
                    value: value.clone(),
                });
            }
        }

        // Advance the odometer; carry past the leftmost spec exhausts it.
        self.done = true;
        for i in (0..self.indices.len()).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.specs[i].choice_count() {
                self.done = false;
                break;
            }
            self.indices[i] = 0;
        }

        Some(Combination { bindings })
    }
}
