use std::collections::HashMap;
use tracing::debug;

use super::fragment::Fragment;
use crate::analyze::FunctionDecl;
use crate::error::{Diagnostic, Location, ShaderError};
use crate::types::{FunctionSignature, ReturnType};

/// Function name to signature, shared by every material library fragment.
#[derive(Debug, Default)]
pub struct FunctionTable {
    entries: HashMap<String, FunctionSignature>,
}

impl FunctionTable {
    /// Record `decl` as declared by `owner`. The first declaration of a name wins.
    ///
    /// Another fragment declaring the same name is a redefinition. Within one
    /// fragment an exported (`void`) declaration replaces a non-void helper of
    /// the same name; any other repeat is an overload and is dropped silently.
    pub(crate) fn register(
        &mut self,
        owner: &Fragment,
        decl: FunctionDecl,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let text = owner.effective_text();
        if let Some(existing) = self.entries.get(&decl.name) {
            if existing.owner != owner.id {
                diagnostics.push(Diagnostic::new(
                    &owner.path,
                    text,
                    decl.offset,
                    ShaderError::FunctionRedefinition {
                        name: decl.name,
                        previous: existing.location.clone(),
                    },
                ));
                return;
            }
            if existing.is_exported() || decl.return_type != ReturnType::Void {
                return;
            }
        }

        debug!(function = %decl.name, fragment = %owner.name, "registered library function");
        let signature = FunctionSignature {
            location: Location::at(&owner.path, text, decl.offset),
            name: decl.name.clone(),
            owner: owner.id,
            return_type: decl.return_type,
            parameters: decl.parameters,
        };
        self.entries.insert(decl.name, signature);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All signatures ordered by name.
    pub fn sorted(&self) -> Vec<&FunctionSignature> {
        let mut all: Vec<&FunctionSignature> = self.entries.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}
