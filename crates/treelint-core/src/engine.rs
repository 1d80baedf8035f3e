//! The check engine: configuration binding, kind dispatch, and the tree walk.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::check::{Check, CheckBox, CheckContext, CheckError};
use crate::config::{CheckOptions, Config, ConfigError};
use crate::source::FileSource;
use crate::tree::{Kind, NodeId, SyntaxTree};
use crate::types::{Severity, Violation};

/// Errors that abort an engine build or an entire run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration or contract error, detected before any file is walked.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A check failed during traversal. The whole run's output is void: a
    /// traversal-time failure indicates a defect, not a data problem.
    #[error("check `{check}` failed during traversal: {source}")]
    Check {
        /// The failing check's name.
        check: &'static str,
        /// Underlying check error.
        source: CheckError,
    },
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    checks: Vec<CheckBox>,
    config: Config,
}

impl EngineBuilder {
    /// Creates a new builder with no checks registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check.
    #[must_use]
    pub fn check<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Registers a boxed check.
    #[must_use]
    pub fn check_box(mut self, check: CheckBox) -> Self {
        self.checks.push(check);
        self
    }

    /// Registers several boxed checks.
    #[must_use]
    pub fn checks<I>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = CheckBox>,
    {
        self.checks.extend(checks);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Binds configuration, validates every check's kind contract, and builds
    /// the dispatch table.
    ///
    /// Disabled checks are dropped here; everything else fails fast so that
    /// traversal-time errors can only mean genuine defects.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError::Config`] for invalid options, unknown token
    /// names, or a broken `required ⊆ configured ⊆ acceptable` contract.
    pub fn build(self) -> Result<Engine, EngineError> {
        let config = self.config;
        let mut registered = Vec::new();

        for mut check in self.checks {
            let name = check.name();
            if !config.is_enabled(name) {
                debug!("skipping disabled check: {name}");
                continue;
            }

            let section = config.check_config(name);
            let options = CheckOptions::new(name, section);
            check.configure(&options)?;

            let acceptable: HashSet<Kind> = check.acceptable_kinds().iter().copied().collect();
            for &kind in check.default_kinds() {
                if !acceptable.contains(&kind) {
                    return Err(ConfigError::KindContract {
                        check: name.to_owned(),
                        detail: format!("default kind {kind} is not acceptable"),
                    }
                    .into());
                }
            }
            for &kind in check.required_kinds() {
                if !acceptable.contains(&kind) {
                    return Err(ConfigError::KindContract {
                        check: name.to_owned(),
                        detail: format!("required kind {kind} is not acceptable"),
                    }
                    .into());
                }
            }

            let configured = match section.and_then(|s| s.tokens.as_ref()) {
                Some(tokens) => {
                    let mut kinds = Vec::new();
                    for token in tokens {
                        let kind =
                            Kind::from_name(token).ok_or_else(|| ConfigError::UnknownKind {
                                check: name.to_owned(),
                                token: token.clone(),
                            })?;
                        if !acceptable.contains(&kind) {
                            return Err(ConfigError::KindContract {
                                check: name.to_owned(),
                                detail: format!("configured kind {kind} is not acceptable"),
                            }
                            .into());
                        }
                        kinds.push(kind);
                    }
                    kinds
                }
                None => check.default_kinds().to_vec(),
            };

            for &kind in check.required_kinds() {
                if !configured.contains(&kind) {
                    return Err(ConfigError::KindContract {
                        check: name.to_owned(),
                        detail: format!("required kind {kind} is not configured"),
                    }
                    .into());
                }
            }

            let severity = config.severity(name).unwrap_or(check.default_severity());
            debug!(
                "registered check {name} for {} kind(s) at severity {severity}",
                configured.len()
            );
            registered.push(Registered {
                check,
                kinds: configured,
                severity,
            });
        }

        let mut dispatch: HashMap<Kind, Vec<usize>> = HashMap::new();
        for (index, reg) in registered.iter().enumerate() {
            for &kind in &reg.kinds {
                dispatch.entry(kind).or_default().push(index);
            }
        }

        info!("engine ready with {} check(s)", registered.len());
        Ok(Engine {
            checks: registered,
            dispatch,
        })
    }
}

struct Registered {
    check: CheckBox,
    kinds: Vec<Kind>,
    severity: Severity,
}

/// The dispatcher: walks each file's tree once and fans every node out to the
/// checks registered for its kind, in enter and leave phases.
///
/// The kind-to-checks table is built once at [`EngineBuilder::build`], so
/// traversal costs O(nodes × interested checks), not O(nodes × all checks).
///
/// `run_file` takes `&mut self` because checks are stateful across one file;
/// a host processing files in parallel builds one engine per worker, and the
/// mandatory `begin_file` reset keeps files isolated either way.
pub struct Engine {
    checks: Vec<Registered>,
    dispatch: HashMap<Kind, Vec<usize>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("check_count", &self.checks.len())
            .field("dispatch_kinds", &self.dispatch.len())
            .finish()
    }
}

enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

impl Engine {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Number of registered (enabled) checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Runs every registered check over one file.
    ///
    /// Returns the file's violations already ordered by `(line, column)`,
    /// insertion order breaking ties.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Check`] if any check raises during traversal;
    /// the run as a whole must then be considered failed.
    pub fn run_file(
        &mut self,
        tree: &SyntaxTree,
        source: &FileSource,
    ) -> Result<Vec<Violation>, EngineError> {
        debug!("walking {}", source.path().display());
        let Self { checks, dispatch } = self;
        let mut ctx = CheckContext::new(tree, source);

        for reg in checks.iter_mut() {
            ctx.set_current(reg.check.name(), reg.severity);
            reg.check.begin_file(&mut ctx);
        }

        let mut stack = vec![Step::Enter(tree.root().id())];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    let node = tree.get(id);
                    if let Some(interested) = dispatch.get(&node.kind()) {
                        for &index in interested {
                            let reg = &mut checks[index];
                            ctx.set_current(reg.check.name(), reg.severity);
                            reg.check.enter(node, &mut ctx).map_err(|source| {
                                EngineError::Check {
                                    check: reg.check.name(),
                                    source,
                                }
                            })?;
                        }
                    }
                    stack.push(Step::Leave(id));
                    for &child in tree.child_ids(id).iter().rev() {
                        stack.push(Step::Enter(child));
                    }
                }
                Step::Leave(id) => {
                    let node = tree.get(id);
                    if let Some(interested) = dispatch.get(&node.kind()) {
                        for &index in interested {
                            let reg = &mut checks[index];
                            ctx.set_current(reg.check.name(), reg.severity);
                            reg.check.leave(node, &mut ctx).map_err(|source| {
                                EngineError::Check {
                                    check: reg.check.name(),
                                    source,
                                }
                            })?;
                        }
                    }
                }
            }
        }

        for reg in checks.iter_mut() {
            ctx.set_current(reg.check.name(), reg.severity);
            reg.check.end_file(&mut ctx);
        }

        let mut violations = ctx.into_violations();
        violations.sort_by_key(Violation::sort_key);
        debug!(
            "{}: {} violation(s)",
            source.path().display(),
            violations.len()
        );
        Ok(violations)
    }
}
