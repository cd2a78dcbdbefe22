use tracing::debug;

use super::functions::FunctionTable;
use crate::analyze::{rewrite_enums, scan_builtins, scan_functions, BuiltinBits, Finding};
use crate::config::Config;
use crate::error::Diagnostic;
use crate::types::{FragmentId, SourceEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Unresolved,
    Resolving,
    Resolved,
    Failed,
}

/// One named shader source plus everything derived from it.
#[derive(Debug)]
pub struct Fragment {
    pub(crate) id: FragmentId,
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) raw_text: String,
    pub(crate) rewritten_text: Option<String>,
    pub(crate) builtins: BuiltinBits,
    /// Transitive dependencies, dependency-first, without duplicates.
    pub(crate) dependencies: Vec<FragmentId>,
    pub(crate) state: ResolveState,
}

impl Fragment {
    /// Wrap a raw entry, running the per-fragment analysis passes.
    pub(crate) fn new(
        id: FragmentId,
        entry: SourceEntry,
        config: &Config,
        functions: &mut FunctionTable,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut fragment = Self {
            id,
            builtins: scan_builtins(&entry.text),
            name: entry.name,
            path: entry.path,
            raw_text: entry.text,
            rewritten_text: None,
            dependencies: Vec::new(),
            state: ResolveState::Unresolved,
        };

        // Only shared headers carry C/C++ enums.
        if config.is_header(&fragment.name) {
            let typed = config.requires_typed_enums(&fragment.name);
            let rewrite = rewrite_enums(&fragment.raw_text, typed);
            fragment.report_all(&fragment.raw_text, rewrite.findings, diagnostics);
            fragment.rewritten_text = rewrite.text;
        }

        if config.is_material_library(&fragment.name) {
            let text = fragment.effective_text();
            let scan = scan_functions(text, config.max_function_parameters);
            fragment.report_all(text, scan.findings, diagnostics);
            for decl in scan.declarations {
                functions.register(&fragment, decl, diagnostics);
            }
        }

        fragment
    }

    fn report_all(&self, text: &str, findings: Vec<Finding>, diagnostics: &mut Vec<Diagnostic>) {
        for finding in findings {
            let diagnostic = Diagnostic::new(&self.path, text, finding.offset, finding.error);
            debug!(fragment = %self.name, "{}", diagnostic.error);
            diagnostics.push(diagnostic);
        }
    }

    pub fn id(&self) -> FragmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn rewritten_text(&self) -> Option<&str> {
        self.rewritten_text.as_deref()
    }

    /// The rewritten text when there is one, the raw text otherwise.
    pub fn effective_text(&self) -> &str {
        self.rewritten_text.as_deref().unwrap_or(&self.raw_text)
    }

    /// Builtins referenced by this fragment's own raw text.
    pub fn builtins(&self) -> BuiltinBits {
        self.builtins
    }

    pub fn dependencies(&self) -> &[FragmentId] {
        &self.dependencies
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == ResolveState::Resolved
    }
}
