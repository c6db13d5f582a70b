//! Condition evaluation against the zero/sign/overflow flags.

use crate::{Address, Condition, ConditionCodes, SimError};

impl Condition {
    /// Returns `true` when this condition holds for `cc`.
    #[must_use]
    pub const fn holds(self, cc: ConditionCodes) -> bool {
        let less = cc.sign() ^ cc.overflow();
        match self {
            Self::Always => true,
            Self::Le => less || cc.zero(),
            Self::Lt => less,
            Self::Eq => cc.zero(),
            Self::Ne => !cc.zero(),
            Self::Ge => !less,
            Self::Gt => !less && !cc.zero(),
        }
    }
}

/// Evaluates a raw condition selector against `cc`.
///
/// # Errors
///
/// Returns [`SimError::BadCondition`] naming `pc` when `selector` is not one
/// of the seven defined conditions.
pub fn check_condition(
    cc: ConditionCodes,
    selector: u8,
    pc: Address,
) -> Result<bool, SimError> {
    Condition::from_selector(selector)
        .map(|cond| cond.holds(cc))
        .ok_or(SimError::BadCondition { pc, selector })
}

#[cfg(test)]
mod tests {
    use super::check_condition;
    use crate::{Condition, ConditionCodes, SimError};

    fn reference(cond: Condition, zero: bool, sign: bool, overflow: bool) -> bool {
        match cond {
            Condition::Always => true,
            Condition::Le => (sign != overflow) || zero,
            Condition::Lt => sign != overflow,
            Condition::Eq => zero,
            Condition::Ne => !zero,
            Condition::Ge => sign == overflow,
            Condition::Gt => sign == overflow && !zero,
        }
    }

    #[test]
    fn truth_table_covers_all_flag_combinations() {
        let mut cases = 0;
        for bits in 0_u8..8 {
            let cc = ConditionCodes::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            for cond in Condition::ALL {
                assert_eq!(
                    check_condition(cc, cond.selector(), 0),
                    Ok(reference(cond, cc.zero(), cc.sign(), cc.overflow())),
                    "{cond:?} with zf={} sf={} of={}",
                    cc.zero(),
                    cc.sign(),
                    cc.overflow()
                );
                cases += 1;
            }
        }
        assert_eq!(cases, 56);
    }

    #[test]
    fn signed_comparisons_follow_sign_xor_overflow() {
        let negative = ConditionCodes::new(false, true, false);
        assert!(Condition::Lt.holds(negative));
        assert!(Condition::Le.holds(negative));
        assert!(!Condition::Ge.holds(negative));
        assert!(!Condition::Gt.holds(negative));

        let overflowed_negative = ConditionCodes::new(false, true, true);
        assert!(!Condition::Lt.holds(overflowed_negative));
        assert!(Condition::Gt.holds(overflowed_negative));

        let zero = ConditionCodes::new(true, false, false);
        assert!(Condition::Le.holds(zero));
        assert!(Condition::Ge.holds(zero));
        assert!(!Condition::Gt.holds(zero));
        assert!(!Condition::Ne.holds(zero));
    }

    #[test]
    fn unassigned_selector_is_fatal_and_names_pc() {
        for selector in 7_u8..=0xF {
            assert_eq!(
                check_condition(ConditionCodes::default(), selector, 0x40),
                Err(SimError::BadCondition {
                    pc: 0x40,
                    selector
                })
            );
        }
    }
}
