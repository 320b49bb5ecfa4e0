//! Compiles expressions into a flat list of calculations evaluated row by
//! row over the extended domain.
//!
//! Identical subtrees, constants and rotations are stored once: adding an
//! expression whose calculation already exists returns the existing
//! intermediate. Lookups go through hash maps kept alongside the lists. Each calculation only reads constants, columns, challenges
//! and earlier intermediates, so evaluating them in order is enough.

use crate::{circuits::expr::Expression, table::RefTable};
use ark_ff::FftField;
use ark_poly::{Evaluations, Radix2EvaluationDomain as D};
use std::collections::HashMap;

/// Where the operand of a calculation comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueSource {
    /// An entry of the constant pool
    Constant(usize),
    /// The result of an earlier calculation
    Intermediate(usize),
    /// (column index, rotation index)
    Fixed(usize, usize),
    /// (column index, rotation index)
    Advice(usize, usize),
    /// (column index, rotation index)
    Instance(usize, usize),
    Challenge(usize),
    Beta,
    Gamma,
    Theta,
    Y,
    /// The value the evaluation is folded into
    PreviousValue,
}

impl ValueSource {
    /// The constant pool always starts with 0, 1 and 2.
    pub const ZERO: ValueSource = ValueSource::Constant(0);
    pub const ONE: ValueSource = ValueSource::Constant(1);
    pub const TWO: ValueSource = ValueSource::Constant(2);

    fn get<F: FftField>(
        &self,
        constants: &[F],
        intermediates: &[F],
        rotations: &[usize],
        input: &EvaluationInput<'_, F>,
        previous_value: F,
    ) -> F {
        match self {
            ValueSource::Constant(index) => constants[*index],
            ValueSource::Intermediate(index) => intermediates[*index],
            ValueSource::Fixed(column, rotation) => {
                input.table.fixed_columns()[*column].evals[rotations[*rotation]]
            }
            ValueSource::Advice(column, rotation) => {
                input.table.advice_columns()[*column].evals[rotations[*rotation]]
            }
            ValueSource::Instance(column, rotation) => {
                input.table.instance_columns()[*column].evals[rotations[*rotation]]
            }
            ValueSource::Challenge(index) => input.challenges[*index],
            ValueSource::Beta => input.beta,
            ValueSource::Gamma => input.gamma,
            ValueSource::Theta => input.theta,
            ValueSource::Y => input.y,
            ValueSource::PreviousValue => previous_value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Calculation {
    Add(ValueSource, ValueSource),
    Sub(ValueSource, ValueSource),
    Mul(ValueSource, ValueSource),
    Negate(ValueSource),
    /// `init * factor^k + parts[0] * factor^(k-1) + ... + parts[k-1]`
    Horner(ValueSource, Vec<ValueSource>, ValueSource),
    Store(ValueSource),
}

impl Calculation {
    fn evaluate<F: FftField>(
        &self,
        constants: &[F],
        intermediates: &[F],
        rotations: &[usize],
        input: &EvaluationInput<'_, F>,
        previous_value: F,
    ) -> F {
        let get = |source: &ValueSource| {
            source.get(constants, intermediates, rotations, input, previous_value)
        };
        match self {
            Calculation::Add(a, b) => get(a) + get(b),
            Calculation::Sub(a, b) => get(a) - get(b),
            Calculation::Mul(a, b) => get(a) * get(b),
            Calculation::Negate(a) => -get(a),
            Calculation::Horner(init, parts, factor) => {
                let factor = get(factor);
                parts
                    .iter()
                    .fold(get(init), |value, part| value * factor + get(part))
            }
            Calculation::Store(a) => get(a),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CalculationInfo {
    pub calculation: Calculation,
    pub target: usize,
}

/// What a graph is evaluated on: the columns over the extended coset and
/// the challenges of the proof.
pub struct EvaluationInput<'a, F: FftField> {
    pub table: RefTable<'a, Evaluations<F, D<F>>>,
    pub challenges: &'a [F],
    pub beta: F,
    pub gamma: F,
    pub theta: F,
    pub y: F,
    /// Extended rows per base row
    pub rot_scale: i32,
    /// Number of extended rows
    pub isize: i32,
}

/// Scratch space of one evaluation, reused from row to row.
pub struct EvaluationData<F> {
    intermediates: Vec<F>,
    rotations: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct GraphEvaluator<F> {
    constants: Vec<F>,
    rotations: Vec<i32>,
    calculations: Vec<CalculationInfo>,
    num_intermediates: usize,
    constant_indices: HashMap<F, usize>,
    rotation_indices: HashMap<i32, usize>,
    calculation_targets: HashMap<Calculation, usize>,
}

impl<F: FftField> Default for GraphEvaluator<F> {
    fn default() -> Self {
        let constants = vec![F::zero(), F::one(), F::from(2u64)];
        let constant_indices = constants
            .iter()
            .enumerate()
            .map(|(index, constant)| (*constant, index))
            .collect();
        GraphEvaluator {
            constants,
            rotations: vec![],
            calculations: vec![],
            num_intermediates: 0,
            constant_indices,
            rotation_indices: HashMap::new(),
            calculation_targets: HashMap::new(),
        }
    }
}

impl<F: FftField> GraphEvaluator<F> {
    pub fn constants(&self) -> &[F] {
        &self.constants
    }

    pub fn rotations(&self) -> &[i32] {
        &self.rotations
    }

    pub fn calculations(&self) -> &[CalculationInfo] {
        &self.calculations
    }

    pub fn num_intermediates(&self) -> usize {
        self.num_intermediates
    }

    pub fn add_rotation(&mut self, rotation: i32) -> usize {
        if let Some(index) = self.rotation_indices.get(&rotation) {
            return *index;
        }
        self.rotations.push(rotation);
        let index = self.rotations.len() - 1;
        self.rotation_indices.insert(rotation, index);
        index
    }

    pub fn add_constant(&mut self, constant: F) -> ValueSource {
        if let Some(index) = self.constant_indices.get(&constant) {
            return ValueSource::Constant(*index);
        }
        self.constants.push(constant);
        let index = self.constants.len() - 1;
        self.constant_indices.insert(constant, index);
        ValueSource::Constant(index)
    }

    /// Appends a calculation, unless the same one already exists.
    pub fn add_calculation(&mut self, calculation: Calculation) -> ValueSource {
        if let Some(target) = self.calculation_targets.get(&calculation) {
            return ValueSource::Intermediate(*target);
        }
        let target = self.num_intermediates;
        self.calculation_targets.insert(calculation.clone(), target);
        self.calculations.push(CalculationInfo {
            calculation,
            target,
        });
        self.num_intermediates += 1;
        ValueSource::Intermediate(target)
    }

    /// Compiles `expr`, folding away additions of 0 and products by 0 or 1.
    ///
    /// # Panics
    ///
    /// Panics on a selector, which must have been replaced by a fixed
    /// column.
    pub fn add_expression(&mut self, expr: &Expression<F>) -> ValueSource {
        match expr {
            Expression::Constant(scalar) => self.add_constant(*scalar),
            Expression::Selector(_) => {
                unreachable!("selectors are replaced by fixed columns before compilation")
            }
            Expression::Fixed(query) => {
                let rotation = self.add_rotation(query.rotation().0);
                self.add_calculation(Calculation::Store(ValueSource::Fixed(
                    query.column_index(),
                    rotation,
                )))
            }
            Expression::Advice(query) => {
                let rotation = self.add_rotation(query.rotation().0);
                self.add_calculation(Calculation::Store(ValueSource::Advice(
                    query.column_index(),
                    rotation,
                )))
            }
            Expression::Instance(query) => {
                let rotation = self.add_rotation(query.rotation().0);
                self.add_calculation(Calculation::Store(ValueSource::Instance(
                    query.column_index(),
                    rotation,
                )))
            }
            Expression::Challenge(challenge) => {
                self.add_calculation(Calculation::Store(ValueSource::Challenge(challenge.index())))
            }
            Expression::Negated(a) => match **a {
                Expression::Constant(scalar) => self.add_constant(-scalar),
                _ => {
                    let a = self.add_expression(a);
                    if a == ValueSource::ZERO {
                        a
                    } else {
                        self.add_calculation(Calculation::Negate(a))
                    }
                }
            },
            Expression::Sum(a, b) => match &**b {
                // a - b is built as a + (-b)
                Expression::Negated(b) => {
                    let a = self.add_expression(a);
                    let b = self.add_expression(b);
                    if a == ValueSource::ZERO {
                        self.add_calculation(Calculation::Negate(b))
                    } else if b == ValueSource::ZERO {
                        a
                    } else {
                        self.add_calculation(Calculation::Sub(a, b))
                    }
                }
                _ => {
                    let a = self.add_expression(a);
                    let b = self.add_expression(b);
                    if a == ValueSource::ZERO {
                        b
                    } else if b == ValueSource::ZERO {
                        a
                    } else if a <= b {
                        self.add_calculation(Calculation::Add(a, b))
                    } else {
                        self.add_calculation(Calculation::Add(b, a))
                    }
                }
            },
            Expression::Product(a, b) => {
                let a = self.add_expression(a);
                let b = self.add_expression(b);
                if a == ValueSource::ZERO || b == ValueSource::ZERO {
                    ValueSource::ZERO
                } else if a == ValueSource::ONE {
                    b
                } else if b == ValueSource::ONE {
                    a
                } else if a <= b {
                    self.add_calculation(Calculation::Mul(a, b))
                } else {
                    self.add_calculation(Calculation::Mul(b, a))
                }
            }
            Expression::Scaled(a, scalar) => {
                if scalar.is_zero() {
                    ValueSource::ZERO
                } else if scalar.is_one() {
                    self.add_expression(a)
                } else {
                    let scalar = self.add_constant(*scalar);
                    let a = self.add_expression(a);
                    self.add_calculation(Calculation::Mul(a, scalar))
                }
            }
        }
    }

    /// Fresh scratch space for [GraphEvaluator::evaluate].
    pub fn instance(&self) -> EvaluationData<F> {
        EvaluationData {
            intermediates: vec![F::zero(); self.num_intermediates],
            rotations: vec![0; self.rotations.len()],
        }
    }

    /// Evaluates the graph on extended row `idx` and returns the result of
    /// the last calculation, or zero for an empty graph.
    pub fn evaluate(
        &self,
        data: &mut EvaluationData<F>,
        input: &EvaluationInput<'_, F>,
        previous_value: F,
        idx: usize,
    ) -> F {
        for (rotation_index, rotation) in self.rotations.iter().enumerate() {
            data.rotations[rotation_index] =
                get_rotation_idx(idx, *rotation, input.rot_scale, input.isize);
        }

        for info in self.calculations.iter() {
            data.intermediates[info.target] = info.calculation.evaluate(
                &self.constants,
                &data.intermediates,
                &data.rotations,
                input,
                previous_value,
            );
        }

        match self.calculations.last() {
            Some(info) => data.intermediates[info.target],
            None => F::zero(),
        }
    }
}

/// Extended row reached from `idx` by `rotation` base rows, wrapping around.
pub fn get_rotation_idx(idx: usize, rotation: i32, rot_scale: i32, isize: i32) -> usize {
    (idx as i32 + rotation * rot_scale).rem_euclid(isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::query::{AdviceQuery, FixedQuery, Rotation};
    use ark_bn254::Fr;
    use ark_poly::EvaluationDomain;

    fn advice(column_index: usize, rotation: i32) -> Expression<Fr> {
        Expression::Advice(AdviceQuery {
            index: column_index,
            column_index,
            rotation: Rotation(rotation),
            phase: 0,
        })
    }

    fn fixed(column_index: usize) -> Expression<Fr> {
        Expression::Fixed(FixedQuery {
            index: column_index,
            column_index,
            rotation: Rotation::cur(),
        })
    }

    fn constant(value: u64) -> Expression<Fr> {
        Expression::Constant(Fr::from(value))
    }

    #[test]
    fn test_rotation_idx_wraps() {
        assert_eq!(get_rotation_idx(0, -1, 2, 32), 30);
        assert_eq!(get_rotation_idx(31, 1, 2, 32), 1);
        assert_eq!(get_rotation_idx(5, 0, 4, 32), 5);
    }

    #[test]
    fn test_deduplication() {
        let mut graph = GraphEvaluator::<Fr>::default();
        let expr = fixed(0) * (advice(0, 0) + advice(1, 1));
        let first = graph.add_expression(&expr);
        let calculations = graph.calculations().len();
        let second = graph.add_expression(&expr);
        assert_eq!(first, second);
        assert_eq!(graph.calculations().len(), calculations);

        // operands are sorted, so the commuted sum is the same calculation
        let commuted = graph.add_expression(&(advice(1, 1) + advice(0, 0)));
        assert_eq!(commuted, ValueSource::Intermediate(3));
        assert_eq!(graph.calculations().len(), calculations);
        assert_eq!(
            graph.calculations()[3].calculation,
            Calculation::Add(ValueSource::Intermediate(1), ValueSource::Intermediate(2))
        );

        // rotations and constants are pooled
        graph.add_expression(&(advice(0, 1) * constant(5)));
        graph.add_expression(&(advice(1, 1) * constant(5)));
        assert_eq!(graph.rotations(), &[0, 1]);
        assert_eq!(graph.constants().len(), 4);
    }

    #[test]
    fn test_deduplication_across_many_expressions() {
        let mut graph = GraphEvaluator::<Fr>::default();
        for round in 0..2 {
            for column in 0..200 {
                graph.add_expression(&(advice(column, column as i32 % 3) * constant(7)));
            }
            // the second round only hits existing entries
            assert_eq!(graph.calculations().len(), 400, "round {round}");
        }
        assert_eq!(graph.rotations(), &[0, 1, 2]);
        assert_eq!(graph.constants().len(), 4);
        assert_eq!(graph.num_intermediates(), 400);
        let targets: Vec<usize> = graph.calculations().iter().map(|info| info.target).collect();
        assert_eq!(targets, (0..400).collect::<Vec<_>>());
    }

    #[test]
    fn test_simplifications() {
        let mut graph = GraphEvaluator::<Fr>::default();
        assert_eq!(graph.add_expression(&(advice(0, 0) * constant(0))), ValueSource::ZERO);
        let a = graph.add_expression(&advice(0, 0));
        assert_eq!(graph.add_expression(&(advice(0, 0) * constant(1))), a);
        assert_eq!(graph.add_expression(&(constant(0) + advice(0, 0))), a);
        assert_eq!(graph.add_expression(&(advice(0, 0) * Fr::from(1u64))), a);
        assert_eq!(graph.add_expression(&(advice(0, 0) * Fr::from(0u64))), ValueSource::ZERO);
        assert_eq!(graph.add_expression(&-constant(0)), ValueSource::ZERO);
        assert_eq!(graph.add_expression(&-constant(2)), ValueSource::Constant(3));
        assert_eq!(graph.constants()[3], -Fr::from(2u64));

        let sub = graph.add_expression(&(advice(0, 0) - advice(1, 0)));
        let b = graph.add_expression(&advice(1, 0));
        assert_eq!(b, ValueSource::Intermediate(1));
        assert_eq!(sub, ValueSource::Intermediate(2));
        assert_eq!(graph.calculations()[2].calculation, Calculation::Sub(a, b));

        // 0 - b becomes a negation
        let negated = graph.add_expression(&(constant(0) - advice(1, 0)));
        assert_eq!(
            graph.calculations().last().map(|info| info.calculation.clone()),
            Some(Calculation::Negate(b))
        );
        assert_eq!(negated, ValueSource::Intermediate(3));
    }

    #[test]
    fn test_evaluate_matches_expression() {
        let domain = D::<Fr>::new(8).unwrap();
        let column = |values: Vec<u64>| {
            Evaluations::from_vec_and_domain(values.into_iter().map(Fr::from).collect(), domain)
        };
        let fixed_columns = vec![column(vec![1, 0, 1, 0, 1, 0, 1, 0])];
        let advice_columns = vec![
            column(vec![1, 2, 3, 4, 5, 6, 7, 8]),
            column(vec![8, 7, 6, 5, 4, 3, 2, 1]),
        ];
        let input = EvaluationInput {
            table: RefTable::new(&fixed_columns, &advice_columns, &[]),
            challenges: &[],
            beta: Fr::from(0u64),
            gamma: Fr::from(0u64),
            theta: Fr::from(0u64),
            y: Fr::from(10u64),
            rot_scale: 1,
            isize: 8,
        };

        // q * (a(X) + b(omega X) - 3), folded into the previous value with y
        let expr = fixed(0) * (advice(0, 0) + advice(1, 1) - constant(3));
        let mut graph = GraphEvaluator::<Fr>::default();
        let part = graph.add_expression(&expr);
        graph.add_calculation(Calculation::Horner(
            ValueSource::PreviousValue,
            vec![part],
            ValueSource::Y,
        ));

        let mut data = graph.instance();
        // row 2: 1 * (3 + 5 - 3) + 10 * 4
        assert_eq!(
            graph.evaluate(&mut data, &input, Fr::from(4u64), 2),
            Fr::from(45u64)
        );
        // row 7: q is 0, only 10 * 1 remains
        assert_eq!(
            graph.evaluate(&mut data, &input, Fr::from(1u64), 7),
            Fr::from(10u64)
        );
        // row 6: 1 * (7 + 1 - 3)
        assert_eq!(
            graph.evaluate(&mut data, &input, Fr::from(0u64), 6),
            Fr::from(5u64)
        );
    }

    #[test]
    fn test_empty_graph_is_zero() {
        let graph = GraphEvaluator::<Fr>::default();
        let domain = D::<Fr>::new(2).unwrap();
        let columns: Vec<Evaluations<Fr, D<Fr>>> =
            vec![Evaluations::from_vec_and_domain(vec![Fr::from(1u64); 2], domain)];
        let input = EvaluationInput {
            table: RefTable::new(&columns, &columns, &columns),
            challenges: &[],
            beta: Fr::from(0u64),
            gamma: Fr::from(0u64),
            theta: Fr::from(0u64),
            y: Fr::from(0u64),
            rot_scale: 1,
            isize: 2,
        };
        assert_eq!(
            graph.evaluate(&mut graph.instance(), &input, Fr::from(7u64), 0),
            Fr::from(0u64)
        );
    }

    #[test]
    #[should_panic(expected = "selectors are replaced")]
    fn test_selector_is_fatal() {
        use crate::circuits::query::Selector;
        GraphEvaluator::<Fr>::default().add_expression(&Expression::Selector(Selector::simple(0)));
    }
}
