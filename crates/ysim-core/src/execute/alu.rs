//! Two-register ALU dispatch.

use super::flags::{add_flags, logic_flags, sub_flags};
use super::register_operand;
use crate::{AluFunction, ConditionCodes, FaultCode, MachineState, Word};

/// Computes `function` over operands `a` (first register) and `b` (second
/// register). Subtraction is `b - a`. Arithmetic wraps.
#[must_use]
pub const fn alu_result(function: AluFunction, a: Word, b: Word) -> (Word, ConditionCodes) {
    match function {
        AluFunction::Add => {
            let result = b.wrapping_add(a);
            (result, add_flags(a, b, result))
        }
        AluFunction::Sub => {
            let result = b.wrapping_sub(a);
            (result, sub_flags(a, b, result))
        }
        AluFunction::And => {
            let result = a & b;
            (result, logic_flags(result))
        }
        AluFunction::Xor => {
            let result = a ^ b;
            (result, logic_flags(result))
        }
    }
}

/// Reads `ra` and `rb`, writes the result into `rb` and replaces the
/// condition codes.
pub(super) fn execute_op<S: MachineState + ?Sized>(
    state: &mut S,
    function: AluFunction,
    ra: u8,
    rb: u8,
) -> Result<(), FaultCode> {
    let a_reg = register_operand(ra)?;
    let b_reg = register_operand(rb)?;
    let (result, cc) = alu_result(function, state.register(a_reg), state.register(b_reg));
    state.set_register(b_reg, result);
    state.set_condition_codes(cc);
    Ok(())
}
