//! Check presets for common configurations.

use treelint_core::CheckBox;

use crate::{
    EmptyBlock, EmptyCatchBlock, HeaderCheck, IllegalCatch, IllegalThrows, IllegalType,
    JavadocTagsCheck, MultiHeaderCheck, MultipleStringLiterals, RegexpHeaderCheck,
};

/// Returns every built-in check with its default settings.
///
/// The header checks are inert until a header is configured, so registering
/// them unconditionally is harmless.
#[must_use]
pub fn all_checks() -> Vec<CheckBox> {
    vec![
        Box::new(IllegalType::new()),
        Box::new(IllegalCatch::new()),
        Box::new(IllegalThrows::new()),
        Box::new(MultipleStringLiterals::new()),
        Box::new(EmptyBlock::new()),
        Box::new(EmptyCatchBlock::new()),
        Box::new(HeaderCheck::new()),
        Box::new(RegexpHeaderCheck::new()),
        Box::new(MultiHeaderCheck::new()),
        Box::new(JavadocTagsCheck::new()),
    ]
}

/// Returns the structural checks only: everything that works from the tree,
/// without the file-level header checks.
#[must_use]
pub fn structural_checks() -> Vec<CheckBox> {
    vec![
        Box::new(IllegalType::new()),
        Box::new(IllegalCatch::new()),
        Box::new(IllegalThrows::new()),
        Box::new(MultipleStringLiterals::new()),
        Box::new(EmptyBlock::new()),
        Box::new(EmptyCatchBlock::new()),
        Box::new(JavadocTagsCheck::new()),
    ]
}
