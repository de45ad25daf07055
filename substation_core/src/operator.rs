// /////////////////////////////////////////////////////////////////////////////
// Substation
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Operator
//!
//! Reduces a set of inspectors to a single boolean using `all`/`any`/`none`
//! semantics, with the vacuous-truth rules an empty inspector list implies:
//! `all` and `none` are true on zero inspectors, `any` is false.

use std::sync::Arc;

use crate::capsule::Capsule;
use crate::error::SubstationError;
use crate::inspector::Inspector;

/// The boolean reduction strategy for a set of inspectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorType {
    All,
    Any,
    None,
}

impl OperatorType {
    /// Parses the `type` setting of an operator/condition config. Only
    /// `all`, `any`, and `none` are valid; anything else is a construction
    /// error.
    pub fn parse(s: &str) -> Result<Self, SubstationError> {
        match s {
            "all" => Ok(OperatorType::All),
            "any" => Ok(OperatorType::Any),
            "none" => Ok(OperatorType::None),
            other => Err(SubstationError::InvalidOption(format!(
                "operator type must be one of all, any, none, got {other:?}"
            ))),
        }
    }
}

/// Reduces a list of inspectors against a capsule using one of the
/// `all`/`any`/`none` strategies, then applies an optional top-level
/// negation.
pub struct Operator {
    kind: OperatorType,
    inspectors: Vec<Arc<dyn Inspector>>,
    negate: bool,
}

impl Operator {
    pub fn new(kind: OperatorType, inspectors: Vec<Arc<dyn Inspector>>, negate: bool) -> Self {
        Self { kind, inspectors, negate }
    }

    /// Evaluates every inspector against `capsule` and reduces the results.
    /// Short-circuits where the strategy allows it: `all` stops at the
    /// first failure, `any` stops at the first success.
    pub fn operate(&self, capsule: &Capsule) -> Result<bool, SubstationError> {
        let result = match self.kind {
            OperatorType::All => {
                let mut all_true = true;
                for inspector in &self.inspectors {
                    if !inspector.inspect(capsule)? {
                        all_true = false;
                        break;
                    }
                }
                all_true
            }
            OperatorType::Any => {
                let mut any_true = false;
                for inspector in &self.inspectors {
                    if inspector.inspect(capsule)? {
                        any_true = true;
                        break;
                    }
                }
                any_true
            }
            OperatorType::None => {
                let mut none_true = true;
                for inspector in &self.inspectors {
                    if inspector.inspect(capsule)? {
                        none_true = false;
                        break;
                    }
                }
                none_true
            }
        };

        Ok(if self.negate { !result } else { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);
    impl Inspector for Fixed {
        fn inspect(&self, _capsule: &Capsule) -> Result<bool, SubstationError> {
            Ok(self.0)
        }
    }

    fn fixed(values: &[bool]) -> Vec<Arc<dyn Inspector>> {
        values
            .iter()
            .map(|v| Arc::new(Fixed(*v)) as Arc<dyn Inspector>)
            .collect()
    }

    #[test]
    fn all_empty_is_vacuously_true() {
        let op = Operator::new(OperatorType::All, vec![], false);
        assert!(op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn any_empty_is_false() {
        let op = Operator::new(OperatorType::Any, vec![], false);
        assert!(!op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn none_empty_is_true() {
        let op = Operator::new(OperatorType::None, vec![], false);
        assert!(op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn all_requires_every_inspector_true() {
        let op = Operator::new(OperatorType::All, fixed(&[true, true]), false);
        assert!(op.operate(&Capsule::new(b"".to_vec())).unwrap());
        let op = Operator::new(OperatorType::All, fixed(&[true, false]), false);
        assert!(!op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn any_requires_one_true() {
        let op = Operator::new(OperatorType::Any, fixed(&[false, true]), false);
        assert!(op.operate(&Capsule::new(b"".to_vec())).unwrap());
        let op = Operator::new(OperatorType::Any, fixed(&[false, false]), false);
        assert!(!op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn none_requires_zero_true() {
        let op = Operator::new(OperatorType::None, fixed(&[false, false]), false);
        assert!(op.operate(&Capsule::new(b"".to_vec())).unwrap());
        let op = Operator::new(OperatorType::None, fixed(&[false, true]), false);
        assert!(!op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn negate_inverts_final_result() {
        let op = Operator::new(OperatorType::All, fixed(&[true]), true);
        assert!(!op.operate(&Capsule::new(b"".to_vec())).unwrap());
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!(OperatorType::parse("xor").is_err());
        assert_eq!(OperatorType::parse("all").unwrap(), OperatorType::All);
    }
}
