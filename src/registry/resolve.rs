//! Expansion of require directives into transitive, dependency-first lists.

use std::collections::HashMap;
use tracing::debug;

use super::fragment::{Fragment, ResolveState};
use crate::analyze::lexer::find_token;
use crate::error::{Diagnostic, ShaderError};
use crate::types::FragmentId;

/// Marker error; the located cause has already been pushed as a diagnostic.
#[derive(Debug)]
pub(crate) struct ResolveFailed;

struct Require {
    name: String,
    /// Offset of the name, for diagnostics.
    offset: usize,
    /// Offset just past the closing `)`.
    end: usize,
}

pub(crate) struct Resolver<'a> {
    fragments: &'a mut [Fragment],
    by_name: &'a HashMap<String, FragmentId>,
    diagnostics: &'a mut Vec<Diagnostic>,
    /// `pragma BLENDER_REQUIRE(` or the configured equivalent.
    directive: String,
    stack: Vec<FragmentId>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        fragments: &'a mut [Fragment],
        by_name: &'a HashMap<String, FragmentId>,
        diagnostics: &'a mut Vec<Diagnostic>,
        require_directive: &str,
    ) -> Self {
        Self {
            fragments,
            by_name,
            diagnostics,
            directive: format!("{}(", require_directive),
            stack: Vec::new(),
        }
    }

    /// Resolve every fragment; failures are isolated to the fragments that depend on them.
    pub(crate) fn resolve_all(&mut self) {
        for index in 0..self.fragments.len() {
            let _ = self.resolve(FragmentId(index));
        }
    }

    fn resolve(&mut self, id: FragmentId) -> Result<(), ResolveFailed> {
        match self.fragments[id.0].state {
            ResolveState::Resolved => return Ok(()),
            ResolveState::Failed | ResolveState::Resolving => return Err(ResolveFailed),
            ResolveState::Unresolved => {}
        }

        self.fragments[id.0].state = ResolveState::Resolving;
        self.stack.push(id);
        let result = self.resolve_requires(id);
        self.stack.pop();

        let fragment = &mut self.fragments[id.0];
        match result {
            Ok(()) => {
                fragment.state = ResolveState::Resolved;
                debug!(
                    fragment = %fragment.name,
                    dependencies = fragment.dependencies.len(),
                    "resolved"
                );
            }
            Err(_) => {
                fragment.state = ResolveState::Failed;
                fragment.dependencies.clear();
            }
        }
        result
    }

    fn resolve_requires(&mut self, id: FragmentId) -> Result<(), ResolveFailed> {
        let mut from = 0;
        while let Some(require) = self.next_require(id, from)? {
            from = require.end;

            let Some(&dependency) = self.by_name.get(&require.name) else {
                let error = ShaderError::MissingDependency { name: require.name };
                report(self.diagnostics, &self.fragments[id.0], require.offset, error);
                return Err(ResolveFailed);
            };

            if self.fragments[dependency.0].state == ResolveState::Resolving {
                let mut chain: Vec<String> = self
                    .stack
                    .iter()
                    .skip_while(|&&on_stack| on_stack != dependency)
                    .map(|on_stack| self.fragments[on_stack.0].name.clone())
                    .collect();
                chain.push(self.fragments[dependency.0].name.clone());
                let error = ShaderError::CyclicDependency { chain };
                report(self.diagnostics, &self.fragments[id.0], require.offset, error);
                return Err(ResolveFailed);
            }

            self.resolve(dependency)?;

            let inherited = self.fragments[dependency.0].dependencies.clone();
            let dependencies = &mut self.fragments[id.0].dependencies;
            for dep in inherited.into_iter().chain(std::iter::once(dependency)) {
                if !dependencies.contains(&dep) {
                    dependencies.push(dep);
                }
            }
        }
        Ok(())
    }

    /// Next directive at or after `from`, skipping commented-out ones.
    fn next_require(&mut self, id: FragmentId, from: usize) -> Result<Option<Require>, ResolveFailed> {
        let fragment = &self.fragments[id.0];
        let text = fragment.effective_text();
        let Some(pos) = find_token(text, &self.directive, from) else {
            return Ok(None);
        };

        let name_start = pos + self.directive.len();
        let line_end = text[name_start..]
            .find('\n')
            .map_or(text.len(), |p| name_start + p);
        let Some(close) = text[name_start..line_end].find(')') else {
            report(self.diagnostics, fragment, name_start, ShaderError::MalformedDirective);
            return Err(ResolveFailed);
        };

        let raw = &text[name_start..name_start + close];
        let name = raw.trim();
        Ok(Some(Require {
            name: name.to_string(),
            offset: name_start + (raw.len() - raw.trim_start().len()),
            end: name_start + close + 1,
        }))
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, fragment: &Fragment, offset: usize, error: ShaderError) {
    debug!(fragment = %fragment.name, "{}", error);
    diagnostics.push(Diagnostic::new(
        &fragment.path,
        fragment.effective_text(),
        offset,
        error,
    ));
}
