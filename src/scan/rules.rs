//! Auswertungsregeln je Elementart.

use super::{FaultKind, ScanContext, ScanFault};
use crate::core::{
    DeviceRef, Element, ElementClass, ElementKind, ElementState, MathOp, Operand,
    VarValue,
};
use std::mem::discriminant;

/// Wertet ein Element aus und liefert den Stromfluss an seinem Ausgang.
///
/// Bei einem Laufzeitfehler wird der Fehler notiert, das Element schreibt
/// nichts. Eingangsanweisungen sperren dann, Ausgangsanweisungen reichen den
/// Stromfluss unverändert durch.
pub(super) fn evaluate(element: &mut Element, power: bool, ctx: &mut ScanContext) -> bool {
    if ctx.pending_resets.remove(&element.id) {
        element.reset_state();
    }
    if discriminant(&element.state) != discriminant(&ElementState::initial_for(element.kind)) {
        element.reset_state();
    }

    let missing = element.devices().find(|d| !ctx.variables.contains_key(d));
    let result = match missing {
        Some(missing) => Err(FaultKind::DanglingVariable(missing)),
        None => apply_rule(element, power, ctx),
    };
    match result {
        Ok(out) => out,
        Err(kind) => {
            ctx.faults.push(ScanFault {
                rung: ctx.rung,
                element: element.id,
                kind,
            });
            match element.kind.spec().class {
                ElementClass::Input => false,
                ElementClass::Output => power,
            }
        }
    }
}

fn apply_rule(element: &mut Element, power: bool, ctx: &mut ScanContext) -> Result<bool, FaultKind> {
    let ops = &element.operands;
    match element.kind {
        ElementKind::NormallyOpen => Ok(power && ctx.read_bit(ops[0])),
        ElementKind::NormallyClosed => Ok(power && !ctx.read_bit(ops[0])),
        ElementKind::OneShotRising | ElementKind::OneShotFalling => {
            let current = ctx.read_bit(ops[0]);
            let ElementState::Edge { previous } = &mut element.state else {
                return Ok(false);
            };
            let edge = if element.kind == ElementKind::OneShotRising {
                current && !*previous
            } else {
                !current && *previous
            };
            *previous = current;
            Ok(power && edge)
        }
        ElementKind::OutputEnergize => {
            ctx.write_bit(ops[0], power);
            Ok(power)
        }
        ElementKind::OutputNegated => {
            ctx.write_bit(ops[0], !power);
            Ok(power)
        }
        ElementKind::OutputLatch => {
            if power {
                ctx.write_bit(ops[0], true);
            }
            Ok(power)
        }
        ElementKind::OutputUnlatch => {
            if power {
                ctx.write_bit(ops[0], false);
            }
            Ok(power)
        }
        ElementKind::TimerOnDelay | ElementKind::TimerOffDelay | ElementKind::RetentiveTimer => {
            timer(element, power, ctx).map(|_| power)
        }
        ElementKind::CountUp | ElementKind::CountDown | ElementKind::CountUpDown => {
            counter(element, power, ctx).map(|_| power)
        }
        ElementKind::Compare(op) => {
            let out = power && op.holds(ctx.read_word(ops[0]), ctx.read_word(ops[1]));
            ctx.write_bit(ops[2], out);
            Ok(out)
        }
        ElementKind::Math(op) => {
            if power {
                let value = math(op, ctx.read_word(ops[0]), ctx.read_word(ops[1]))?;
                ctx.write_word(ops[2], value);
            }
            Ok(power)
        }
        ElementKind::Move => {
            if power {
                let value = ctx.read_word(ops[0]);
                ctx.write_word(ops[1], value);
            }
            Ok(power)
        }
        ElementKind::Reset => {
            if power {
                if let Some(target) = ops[0].device() {
                    ctx.reset(target);
                }
            }
            Ok(power)
        }
    }
}

fn math(op: MathOp, a: i32, b: i32) -> Result<i32, FaultKind> {
    let result = match op {
        MathOp::Add => a.checked_add(b),
        MathOp::Sub => a.checked_sub(b),
        MathOp::Mul => a.checked_mul(b),
        MathOp::Div if b == 0 => return Err(FaultKind::DivideByZero),
        MathOp::Div => a.checked_div(b),
    };
    result.ok_or(FaultKind::Overflow)
}

/// TON zählt bei Stromfluss bis zum Sollwert, TOF läuft nach Wegfall des
/// Stromflusses ab, RTO hält seinen Istwert ohne Stromfluss.
fn timer(element: &mut Element, power: bool, ctx: &mut ScanContext) -> Result<(), FaultKind> {
    let preset = ctx.read_word(element.operands[0]);
    if preset < 0 {
        return Err(FaultKind::NegativePreset);
    }
    let ElementState::Timer { accumulator, done } = &mut element.state else {
        return Ok(());
    };
    let advance = |acc: i32| acc.saturating_add(ctx.elapsed).min(preset);

    match element.kind {
        ElementKind::TimerOnDelay => {
            if power {
                *accumulator = advance(*accumulator);
                *done = *accumulator >= preset;
            } else {
                *accumulator = 0;
                *done = false;
            }
        }
        ElementKind::TimerOffDelay => {
            if power {
                *accumulator = 0;
                *done = true;
            } else if *done {
                *accumulator = advance(*accumulator);
                *done = *accumulator < preset;
            }
        }
        _ => {
            if power {
                *accumulator = advance(*accumulator);
                *done = *accumulator >= preset;
            }
        }
    }

    let (acc, out) = (*accumulator, *done);
    ctx.write_word(element.operands[1], acc);
    ctx.write_bit(element.operands[2], out);
    Ok(())
}

/// Zähler zählen auf steigende Flanken des Stromflusses.
///
/// CTU/CTD halten ihr Ausgangsbit bis zum RES, CTUD vergleicht in jedem Zyklus.
fn counter(element: &mut Element, power: bool, ctx: &mut ScanContext) -> Result<(), FaultKind> {
    let preset = ctx.read_word(element.operands[0]);
    if preset < 0 {
        return Err(FaultKind::NegativePreset);
    }
    let down = match element.kind {
        ElementKind::CountUpDown => ctx.read_bit(element.operands[3]),
        _ => false,
    };
    let ElementState::Counter {
        count,
        done,
        previous_input,
        previous_down,
        loaded,
    } = &mut element.state
    else {
        return Ok(());
    };

    let rising = power && !*previous_input;
    *previous_input = power;

    match element.kind {
        ElementKind::CountUp => {
            if rising {
                *count = count.saturating_add(1);
            }
            *done = *done || *count >= preset;
        }
        ElementKind::CountDown => {
            if !*loaded {
                *count = preset;
                *loaded = true;
            }
            if rising && *count > 0 {
                *count -= 1;
            }
            *done = *done || *count <= 0;
        }
        _ => {
            let down_edge = down && !*previous_down;
            *previous_down = down;
            if rising {
                *count = count.saturating_add(1);
            }
            if down_edge {
                *count = count.saturating_sub(1);
            }
            *done = *count >= preset;
        }
    }

    let (value, out) = (*count, *done);
    ctx.write_word(element.operands[1], value);
    ctx.write_bit(element.operands[2], out);
    Ok(())
}

impl ScanContext<'_> {
    fn read(&self, operand: Operand) -> VarValue {
        match operand {
            Operand::Constant(k) => VarValue::Int(k),
            Operand::Device(device) => self
                .variables
                .get(&device)
                .map(|v| v.value)
                .unwrap_or(VarValue::default_for(device.kind)),
        }
    }

    fn read_bit(&self, operand: Operand) -> bool {
        self.read(operand).as_bool()
    }

    fn read_word(&self, operand: Operand) -> i32 {
        self.read(operand).as_int()
    }

    fn write(&mut self, device: DeviceRef, value: VarValue) {
        if let Some(variable) = self.variables.get_mut(&device) {
            variable.value = value;
        }
    }

    fn write_bit(&mut self, operand: Operand, value: bool) {
        if let Some(device) = operand.device() {
            let value = if device.kind.is_discrete() {
                VarValue::Bool(value)
            } else {
                VarValue::Int(i32::from(value))
            };
            self.write(device, value);
        }
    }

    fn write_word(&mut self, operand: Operand, value: i32) {
        if let Some(device) = operand.device() {
            let value = if device.kind.is_discrete() {
                VarValue::Bool(value != 0)
            } else {
                VarValue::Int(value)
            };
            self.write(device, value);
        }
    }

    /// RES: Istwert und Ausgangsbit sofort löschen, Elementzustand vormerken.
    fn reset(&mut self, target: DeviceRef) {
        self.write(target, VarValue::default_for(target.kind));
        let Some(targets) = self.reset_targets.get(&target) else {
            return;
        };
        let mut done_bits = Vec::new();
        for entry in targets {
            self.pending_resets.insert(entry.element);
            done_bits.extend(entry.done);
        }
        for done in done_bits {
            self.write(done, VarValue::default_for(done.kind));
        }
    }
}
