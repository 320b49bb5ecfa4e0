//! A circuit selecting its output with an is-zero gadget: `output = c` when
//! `a = b`, and `output = a - b` otherwise.

use super::framework::TestFramework;
use crate::{
    circuits::{
        assignment::{Assignment, Circuit},
        column::{Advice, Column},
        constraint_system::{ConstraintSystem, VirtualCells},
        expr::Expression,
        query::{Rotation, Selector},
        value::Value,
    },
    error::SynthesisError,
};
use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};

const K: u32 = 4;

/// Constrains `is_zero_expr` to be one when `value` is zero and zero
/// otherwise, given the inverse of `value` as a witness.
#[derive(Clone, Debug)]
struct IsZeroConfig {
    value_inv: Column<Advice>,
    is_zero_expr: Expression<Fr>,
}

impl IsZeroConfig {
    fn configure(
        meta: &mut ConstraintSystem<Fr>,
        q_enable: impl Fn(&mut VirtualCells<'_, Fr>) -> Expression<Fr>,
        value: impl Fn(&mut VirtualCells<'_, Fr>) -> Expression<Fr>,
        value_inv: Column<Advice>,
    ) -> Self {
        let mut is_zero_expr = Expression::Constant(Fr::zero());

        meta.create_gate("is_zero", |meta| {
            let value = value(meta);
            let q_enable = q_enable(meta);
            let value_inv = meta.query_advice(value_inv, Rotation::cur());

            is_zero_expr = Expression::Constant(Fr::one()) - value.clone() * value_inv;
            // value * (1 - value * value_inv) = 0
            vec![q_enable * value * is_zero_expr.clone()]
        });

        IsZeroConfig {
            value_inv,
            is_zero_expr,
        }
    }

    fn assign<A: Assignment<Fr>>(
        &self,
        assignment: &mut A,
        row: usize,
        value: Value<Fr>,
    ) -> Result<(), SynthesisError> {
        let value_inv = value.map(|value| value.inverse().unwrap_or_else(Fr::zero));
        assignment.assign_advice(self.value_inv, row, value_inv)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct IsZeroCircuitConfig {
    s: Selector,
    a: Column<Advice>,
    b: Column<Advice>,
    c: Column<Advice>,
    output: Column<Advice>,
    a_equals_b: IsZeroConfig,
}

/// Assigns `a, b, c` on the first row. `output` replaces the correct output
/// and `value_inv` the inverse of `a - b` when set.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct IsZeroCircuit {
    a: u64,
    b: u64,
    c: u64,
    output: Option<Fr>,
    value_inv: Option<Fr>,
}

impl IsZeroCircuit {
    fn new(a: u64, b: u64, c: u64) -> Self {
        IsZeroCircuit {
            a,
            b,
            c,
            ..Default::default()
        }
    }
}

impl Circuit<Fr> for IsZeroCircuit {
    type Config = IsZeroCircuitConfig;

    fn configure(meta: &mut ConstraintSystem<Fr>) -> IsZeroCircuitConfig {
        let s = meta.selector();
        let a = meta.advice_column();
        let b = meta.advice_column();
        let c = meta.advice_column();
        let output = meta.advice_column();
        let value_inv = meta.advice_column();

        let a_equals_b = IsZeroConfig::configure(
            meta,
            |meta| meta.query_selector(s),
            |meta| meta.query_advice(a, Rotation::cur()) - meta.query_advice(b, Rotation::cur()),
            value_inv,
        );

        meta.create_gate("f(a, b, c) = if a == b {c} else {a - b}", |meta| {
            let s = meta.query_selector(s);
            let a = meta.query_advice(a, Rotation::cur());
            let b = meta.query_advice(b, Rotation::cur());
            let c = meta.query_advice(c, Rotation::cur());
            let output = meta.query_advice(output, Rotation::cur());
            let is_zero = a_equals_b.is_zero_expr.clone();
            let is_not_zero = Expression::Constant(Fr::one()) - is_zero.clone();

            vec![
                ("a == b", s.clone() * is_zero * (output.clone() - c)),
                ("a != b", s * is_not_zero * (output - (a - b))),
            ]
        });

        IsZeroCircuitConfig {
            s,
            a,
            b,
            c,
            output,
            a_equals_b,
        }
    }

    fn synthesize<A: Assignment<Fr>>(
        &self,
        config: IsZeroCircuitConfig,
        assignment: &mut A,
    ) -> Result<(), SynthesisError> {
        let (a, b, c) = (Fr::from(self.a), Fr::from(self.b), Fr::from(self.c));

        assignment.enable_selector(&config.s, 0)?;
        assignment.assign_advice(config.a, 0, Value::known(a))?;
        assignment.assign_advice(config.b, 0, Value::known(b))?;
        assignment.assign_advice(config.c, 0, Value::known(c))?;

        match self.value_inv {
            Some(value_inv) => {
                assignment.assign_advice(config.a_equals_b.value_inv, 0, Value::known(value_inv))?
            }
            None => config.a_equals_b.assign(assignment, 0, Value::known(a - b))?,
        }

        let output = match self.output {
            Some(output) => output,
            None if a == b => c,
            None => a - b,
        };
        assignment.assign_advice(config.output, 0, Value::known(output))
    }
}

#[test]
fn test_is_zero_configuration() {
    let mut cs = ConstraintSystem::<Fr>::default();
    IsZeroCircuit::configure(&mut cs);

    assert_eq!(cs.gates().len(), 2);
    assert_eq!(cs.gates()[0].name(), "is_zero");
    assert_eq!(cs.gates()[1].polynomials().len(), 2);
    assert_eq!(cs.gates()[1].constraint_name(0), "a == b");
    assert_eq!(cs.num_advice_columns(), 5);
    // selector * value * (1 - value * inverse)
    assert_eq!(cs.degree(), 4);
}

#[test]
fn test_is_zero_equal_inputs() {
    let runner = TestFramework::new(K)
        .circuit(IsZeroCircuit::new(3, 3, 2), vec![])
        .setup();
    runner.prove_and_verify().unwrap();
}

#[test]
fn test_is_zero_distinct_inputs() {
    TestFramework::new(K)
        .circuit(IsZeroCircuit::new(3, 1, 5), vec![])
        .circuit(IsZeroCircuit::new(1, 3, 5), vec![])
        .setup()
        .prove_and_verify()
        .unwrap();
}

#[test]
fn test_is_zero_wrong_output() {
    // c is selected although a != b
    let runner = TestFramework::new(K)
        .circuit(
            IsZeroCircuit {
                output: Some(Fr::from(5u64)),
                ..IsZeroCircuit::new(3, 1, 5)
            },
            vec![],
        )
        .setup();
    let proof = runner.prove().unwrap();
    assert!(runner.verify(&proof).is_err());
}

#[test]
fn test_is_zero_wrong_inverse() {
    // a zero inverse claims that a == b
    let runner = TestFramework::new(K)
        .circuit(
            IsZeroCircuit {
                output: Some(Fr::from(5u64)),
                value_inv: Some(Fr::zero()),
                ..IsZeroCircuit::new(3, 1, 5)
            },
            vec![],
        )
        .setup();
    let proof = runner.prove().unwrap();
    assert!(runner.verify(&proof).is_err());
}
