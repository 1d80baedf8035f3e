//! Check forbidding configured type names at declaration sites.
//!
//! # Rationale
//!
//! Declaring members, parameters, and return values as concrete collection
//! implementations (or other named types) couples callers to those
//! implementations. This check flags disallowed names wherever they appear in
//! a declared type, including inside generic arguments and array suffixes.
//!
//! # Configuration
//!
//! - `illegalClassNames`: names to forbid, simple or fully qualified
//!   (default: the common collection implementations)
//! - `validateAbstractClassNames`: also flag abstract-looking names (default: false)
//! - `illegalAbstractClassNameFormat`: what abstract-looking means
//!   (default: `^(.*[.])?Abstract.*$`)
//! - `legalAbstractClassNames`: abstract-looking names that are fine anyway
//! - `ignoredMethodNames`: method names whose signatures are skipped
//!   (default: `getEnvironment`, `getInitialContext`)
//! - `ignoreMethodNamesRegex`: pattern version of the same
//! - `memberModifiers`: when non-empty, only methods and fields carrying one
//!   of these modifiers are checked

use regex::Regex;
use std::collections::HashSet;
use treelint_core::{
    Check, CheckContext, CheckError, CheckOptions, ConfigError, Kind, NodeRef,
};

use crate::util::{modifier_names, type_references};

/// Check name for illegal-type.
pub const NAME: &str = "illegal-type";

const DEFAULT_ILLEGAL: &[&str] = &[
    "HashMap",
    "HashSet",
    "LinkedHashMap",
    "LinkedHashSet",
    "TreeMap",
    "TreeSet",
    "java.util.HashMap",
    "java.util.HashSet",
    "java.util.LinkedHashMap",
    "java.util.LinkedHashSet",
    "java.util.TreeMap",
    "java.util.TreeSet",
];

const DEFAULT_IGNORED_METHODS: &[&str] = &["getEnvironment", "getInitialContext"];

const DEFAULT_ABSTRACT_FORMAT: &str = "^(.*[.])?Abstract.*$";

/// Flags uses of disallowed type names in declarations.
pub struct IllegalType {
    illegal_class_names: HashSet<String>,
    validate_abstract_class_names: bool,
    illegal_abstract_format: Regex,
    legal_abstract_class_names: HashSet<String>,
    ignored_method_names: HashSet<String>,
    ignore_method_names_regex: Option<Regex>,
    member_modifiers: Vec<String>,
}

impl Default for IllegalType {
    fn default() -> Self {
        Self::new()
    }
}

impl IllegalType {
    /// Creates the check with its default settings.
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::expect_used)]
        let illegal_abstract_format =
            Regex::new(DEFAULT_ABSTRACT_FORMAT).expect("default abstract-name pattern is valid");
        Self {
            illegal_class_names: DEFAULT_ILLEGAL.iter().map(|s| (*s).to_owned()).collect(),
            validate_abstract_class_names: false,
            illegal_abstract_format,
            legal_abstract_class_names: HashSet::new(),
            ignored_method_names: DEFAULT_IGNORED_METHODS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            ignore_method_names_regex: None,
            member_modifiers: Vec::new(),
        }
    }

    /// Replaces the illegal name set.
    #[must_use]
    pub fn illegal_class_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.illegal_class_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enables abstract-name validation.
    #[must_use]
    pub fn validate_abstract_class_names(mut self, validate: bool) -> Self {
        self.validate_abstract_class_names = validate;
        self
    }

    fn is_illegal(&self, name: &str) -> bool {
        let simple = name.rsplit('.').next().unwrap_or(name);
        if self.illegal_class_names.contains(name) || self.illegal_class_names.contains(simple) {
            return true;
        }
        self.validate_abstract_class_names
            && self.illegal_abstract_format.is_match(name)
            && !self.legal_abstract_class_names.contains(name)
            && !self.legal_abstract_class_names.contains(simple)
    }

    fn method_is_ignored(&self, method: NodeRef<'_>) -> bool {
        let Some(name) = crate::util::declared_name(method) else {
            return false;
        };
        self.ignored_method_names.contains(name)
            || self
                .ignore_method_names_regex
                .as_ref()
                .is_some_and(|re| re.is_match(name))
    }

    fn member_filter_excludes(&self, def: NodeRef<'_>) -> bool {
        if self.member_modifiers.is_empty() {
            return false;
        }
        let modifiers = modifier_names(def);
        !self
            .member_modifiers
            .iter()
            .any(|m| modifiers.iter().any(|have| have == m))
    }

    fn check_type(&self, ty: NodeRef<'_>, ctx: &mut CheckContext<'_>) {
        for type_ref in type_references(ty) {
            if self.is_illegal(&type_ref.name) {
                ctx.report_with(
                    type_ref.line,
                    type_ref.column,
                    "illegal.type",
                    [type_ref.name],
                );
            }
        }
    }
}

impl Check for IllegalType {
    fn name(&self) -> &'static str {
        NAME
    }

    fn acceptable_kinds(&self) -> &'static [Kind] {
        &[
            Kind::VariableDef,
            Kind::ParameterDef,
            Kind::MethodDef,
            Kind::RecordComponent,
        ]
    }

    fn configure(&mut self, options: &CheckOptions<'_>) -> Result<(), ConfigError> {
        if let Some(names) = options.get_str_list("illegalClassNames")? {
            self.illegal_class_names = names.into_iter().collect();
        }
        self.validate_abstract_class_names =
            options.get_bool("validateAbstractClassNames", self.validate_abstract_class_names)?;
        self.illegal_abstract_format =
            options.get_regex_or("illegalAbstractClassNameFormat", DEFAULT_ABSTRACT_FORMAT)?;
        if let Some(names) = options.get_str_list("legalAbstractClassNames")? {
            self.legal_abstract_class_names = names.into_iter().collect();
        }
        if let Some(names) = options.get_str_list("ignoredMethodNames")? {
            self.ignored_method_names = names.into_iter().collect();
        }
        self.ignore_method_names_regex = options.get_regex("ignoreMethodNamesRegex")?;
        if let Some(modifiers) = options.get_str_list("memberModifiers")? {
            self.member_modifiers = modifiers;
        }
        Ok(())
    }

    fn enter(&mut self, node: NodeRef<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        match node.kind() {
            Kind::MethodDef => {
                if self.method_is_ignored(node) || self.member_filter_excludes(node) {
                    return Ok(());
                }
                if let Some(ty) = node.find_child(Kind::Type) {
                    self.check_type(ty, ctx);
                }
            }
            Kind::VariableDef => {
                if self.member_filter_excludes(node) {
                    return Ok(());
                }
                if let Some(ty) = node.find_child(Kind::Type) {
                    self.check_type(ty, ctx);
                }
            }
            Kind::ParameterDef => {
                // Catch parameters belong to illegal-catch; formal parameters
                // hang off a PARAMETERS list.
                if node.parent().map(|p| p.kind()) != Some(Kind::Parameters) {
                    return Ok(());
                }
                let enclosing_method = node.ancestors().find(|a| a.kind() == Kind::MethodDef);
                if enclosing_method.is_some_and(|m| self.method_is_ignored(m)) {
                    return Ok(());
                }
                if let Some(ty) = node.find_child(Kind::Type) {
                    self.check_type(ty, ctx);
                }
            }
            Kind::RecordComponent => {
                if let Some(ty) = node.find_child(Kind::Type) {
                    self.check_type(ty, ctx);
                }
            }
            _ => return Err(CheckError::unsupported(node)),
        }
        Ok(())
    }
}
