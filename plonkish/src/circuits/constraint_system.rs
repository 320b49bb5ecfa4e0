//! The constraint system: columns, queries, gates, lookups and the
//! permutation, as declared by a circuit's `configure`.

use crate::{
    circuits::{
        column::{Advice, Any, Column, Fixed, Instance},
        expr::Expression,
        query::{AdviceQuery, Challenge, FixedQuery, InstanceQuery, Rotation, Selector},
        selector_compressor::{self, SelectorDescription},
    },
    lookup, permutation,
};
use ark_ff::Field;
use std::cmp::max;

/// A named polynomial constraint.
#[derive(Clone, Debug)]
pub struct Constraint<F> {
    name: String,
    poly: Expression<F>,
}

impl<F> From<Expression<F>> for Constraint<F> {
    fn from(poly: Expression<F>) -> Self {
        Constraint {
            name: String::new(),
            poly,
        }
    }
}

impl<F, S: AsRef<str>> From<(S, Expression<F>)> for Constraint<F> {
    fn from((name, poly): (S, Expression<F>)) -> Self {
        Constraint {
            name: name.as_ref().to_string(),
            poly,
        }
    }
}

/// A gate: a set of polynomials that must vanish on every row.
#[derive(Clone, Debug)]
pub struct Gate<F> {
    name: String,
    constraint_names: Vec<String>,
    polys: Vec<Expression<F>>,
    queried_selectors: Vec<Selector>,
}

impl<F> Gate<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint_name(&self, i: usize) -> &str {
        &self.constraint_names[i]
    }

    pub fn polynomials(&self) -> &[Expression<F>] {
        &self.polys
    }

    pub fn queried_selectors(&self) -> &[Selector] {
        &self.queried_selectors
    }
}

/// Cells queried while building a gate or a lookup.
pub struct VirtualCells<'a, F: Field> {
    meta: &'a mut ConstraintSystem<F>,
    queried_selectors: Vec<Selector>,
}

impl<'a, F: Field> VirtualCells<'a, F> {
    fn new(meta: &'a mut ConstraintSystem<F>) -> Self {
        VirtualCells {
            meta,
            queried_selectors: vec![],
        }
    }

    pub fn query_selector(&mut self, selector: Selector) -> Expression<F> {
        self.queried_selectors.push(selector);
        Expression::Selector(selector)
    }

    pub fn query_fixed(&mut self, column: Column<Fixed>, at: Rotation) -> Expression<F> {
        Expression::Fixed(FixedQuery {
            index: self.meta.query_fixed_index(column, at),
            column_index: column.index(),
            rotation: at,
        })
    }

    pub fn query_advice(&mut self, column: Column<Advice>, at: Rotation) -> Expression<F> {
        Expression::Advice(AdviceQuery {
            index: self.meta.query_advice_index(column, at),
            column_index: column.index(),
            rotation: at,
            phase: column.column_type().phase(),
        })
    }

    pub fn query_instance(&mut self, column: Column<Instance>, at: Rotation) -> Expression<F> {
        Expression::Instance(InstanceQuery {
            index: self.meta.query_instance_index(column, at),
            column_index: column.index(),
            rotation: at,
        })
    }

    /// # Panics
    ///
    /// Panics if the column kind is unresolved.
    pub fn query_any(&mut self, column: impl Into<Column<Any>>, at: Rotation) -> Expression<F> {
        let column = column.into();
        match column.column_type() {
            Any::Advice(advice) => self.query_advice(Column::new(column.index(), *advice), at),
            Any::Fixed => self.query_fixed(Column::new(column.index(), Fixed), at),
            Any::Instance => self.query_instance(Column::new(column.index(), Instance), at),
            Any::Unresolved => panic!("a column of unresolved kind cannot be queried"),
        }
    }

    pub fn query_challenge(&mut self, challenge: Challenge) -> Expression<F> {
        Expression::Challenge(challenge)
    }
}

#[derive(Clone, Debug)]
pub struct ConstraintSystem<F> {
    pub(crate) num_fixed_columns: usize,
    pub(crate) num_advice_columns: usize,
    pub(crate) num_instance_columns: usize,
    pub(crate) num_selectors: usize,
    pub(crate) num_challenges: usize,

    /// Phase of each advice column
    pub(crate) advice_column_phase: Vec<u8>,
    /// Phase after which each challenge can be squeezed
    pub(crate) challenge_phase: Vec<u8>,

    /// Fixed column replacing each selector, filled by selector compression
    pub(crate) selector_map: Vec<Column<Fixed>>,

    pub(crate) gates: Vec<Gate<F>>,
    pub(crate) advice_queries: Vec<(Column<Advice>, Rotation)>,
    /// Number of queries to each advice column
    pub(crate) num_advice_queries: Vec<usize>,
    pub(crate) instance_queries: Vec<(Column<Instance>, Rotation)>,
    pub(crate) fixed_queries: Vec<(Column<Fixed>, Rotation)>,

    pub(crate) permutation: permutation::Argument,
    pub(crate) lookups: Vec<lookup::Argument<F>>,

    pub(crate) minimum_degree: Option<usize>,
}

impl<F: Field> Default for ConstraintSystem<F> {
    fn default() -> Self {
        ConstraintSystem {
            num_fixed_columns: 0,
            num_advice_columns: 0,
            num_instance_columns: 0,
            num_selectors: 0,
            num_challenges: 0,
            advice_column_phase: vec![],
            challenge_phase: vec![],
            selector_map: vec![],
            gates: vec![],
            advice_queries: vec![],
            num_advice_queries: vec![],
            instance_queries: vec![],
            fixed_queries: vec![],
            permutation: permutation::Argument::default(),
            lookups: vec![],
            minimum_degree: None,
        }
    }
}

impl<F: Field> ConstraintSystem<F> {
    pub fn fixed_column(&mut self) -> Column<Fixed> {
        let column = Column::new(self.num_fixed_columns, Fixed);
        self.num_fixed_columns += 1;
        column
    }

    pub fn advice_column(&mut self) -> Column<Advice> {
        self.advice_column_in_phase(0)
    }

    /// # Panics
    ///
    /// Panics if the previous phase has no advice column.
    pub fn advice_column_in_phase(&mut self, phase: u8) -> Column<Advice> {
        if let Some(previous) = phase.checked_sub(1) {
            assert!(
                self.advice_column_phase.contains(&previous),
                "phase {previous} has no advice column, so phase {phase} cannot be used"
            );
        }
        let column = Column::new(self.num_advice_columns, Advice::new(phase));
        self.num_advice_columns += 1;
        self.num_advice_queries.push(0);
        self.advice_column_phase.push(phase);
        column
    }

    pub fn instance_column(&mut self) -> Column<Instance> {
        let column = Column::new(self.num_instance_columns, Instance);
        self.num_instance_columns += 1;
        column
    }

    /// Allocates a simple selector, which may only multiply whole gates.
    pub fn selector(&mut self) -> Selector {
        let index = self.num_selectors;
        self.num_selectors += 1;
        Selector::simple(index)
    }

    /// Allocates a selector that may be used anywhere, including lookups.
    pub fn complex_selector(&mut self) -> Selector {
        let index = self.num_selectors;
        self.num_selectors += 1;
        Selector::complex(index)
    }

    /// Allocates a challenge squeezed once the advice columns of `phase`
    /// are committed.
    ///
    /// # Panics
    ///
    /// Panics if no advice column lives in `phase`.
    pub fn challenge_usable_after(&mut self, phase: u8) -> Challenge {
        assert!(
            self.advice_column_phase.contains(&phase),
            "phase {phase} has no advice column"
        );
        let challenge = Challenge {
            index: self.num_challenges,
            phase,
        };
        self.num_challenges += 1;
        self.challenge_phase.push(phase);
        challenge
    }

    /// Adds the column to the permutation argument, so that it can take
    /// part in copy constraints.
    pub fn enable_equality(&mut self, column: impl Into<Column<Any>>) {
        let column = column.into();
        self.query_any_index(column, Rotation::cur());
        self.permutation.add_column(column);
    }

    pub fn set_minimum_degree(&mut self, degree: usize) {
        self.minimum_degree = Some(degree);
    }

    pub(crate) fn query_fixed_index(&mut self, column: Column<Fixed>, at: Rotation) -> usize {
        if let Some(index) = self.fixed_queries.iter().position(|q| *q == (column, at)) {
            return index;
        }
        self.fixed_queries.push((column, at));
        self.fixed_queries.len() - 1
    }

    pub(crate) fn query_advice_index(&mut self, column: Column<Advice>, at: Rotation) -> usize {
        if let Some(index) = self.advice_queries.iter().position(|q| *q == (column, at)) {
            return index;
        }
        self.advice_queries.push((column, at));
        self.num_advice_queries[column.index()] += 1;
        self.advice_queries.len() - 1
    }

    pub(crate) fn query_instance_index(&mut self, column: Column<Instance>, at: Rotation) -> usize {
        if let Some(index) = self.instance_queries.iter().position(|q| *q == (column, at)) {
            return index;
        }
        self.instance_queries.push((column, at));
        self.instance_queries.len() - 1
    }

    fn query_any_index(&mut self, column: Column<Any>, at: Rotation) -> usize {
        match column.column_type() {
            Any::Advice(advice) => self.query_advice_index(Column::new(column.index(), *advice), at),
            Any::Fixed => self.query_fixed_index(Column::new(column.index(), Fixed), at),
            Any::Instance => self.query_instance_index(Column::new(column.index(), Instance), at),
            Any::Unresolved => panic!("a column of unresolved kind cannot be queried"),
        }
    }

    /// Position of a registered query among the queries of its kind.
    ///
    /// # Panics
    ///
    /// Panics if the column was never queried at `at`.
    pub fn get_any_query_index(&self, column: Column<Any>, at: Rotation) -> usize {
        let position = match column.column_type() {
            Any::Advice(advice) => {
                let column = Column::new(column.index(), *advice);
                self.advice_queries.iter().position(|q| *q == (column, at))
            }
            Any::Fixed => {
                let column = Column::new(column.index(), Fixed);
                self.fixed_queries.iter().position(|q| *q == (column, at))
            }
            Any::Instance => {
                let column = Column::new(column.index(), Instance);
                self.instance_queries.iter().position(|q| *q == (column, at))
            }
            Any::Unresolved => panic!("a column of unresolved kind cannot be queried"),
        };
        match position {
            Some(index) => index,
            None => panic!("column {column:?} is not queried at {at:?}"),
        }
    }

    /// Creates a gate from the constraints returned by `constraints`.
    ///
    /// # Panics
    ///
    /// Panics if the gate has no constraint.
    pub fn create_gate<C, I>(
        &mut self,
        name: &str,
        constraints: impl FnOnce(&mut VirtualCells<'_, F>) -> I,
    ) where
        C: Into<Constraint<F>>,
        I: IntoIterator<Item = C>,
    {
        let mut cells = VirtualCells::new(self);
        let constraints: Vec<Constraint<F>> =
            constraints(&mut cells).into_iter().map(Into::into).collect();
        let queried_selectors = cells.queried_selectors;

        let (constraint_names, polys): (Vec<_>, Vec<_>) = constraints
            .into_iter()
            .map(|constraint| (constraint.name, constraint.poly))
            .unzip();
        assert!(
            !polys.is_empty(),
            "gate \"{name}\" must contain at least one constraint"
        );

        self.gates.push(Gate {
            name: name.to_string(),
            constraint_names,
            polys,
            queried_selectors,
        });
    }

    /// Adds a lookup argument: every row of the inputs must appear as a
    /// row of the tables. Returns the index of the lookup.
    ///
    /// # Panics
    ///
    /// Panics if an input uses a simple selector.
    pub fn lookup(
        &mut self,
        name: &str,
        table_map: impl FnOnce(&mut VirtualCells<'_, F>) -> Vec<(Expression<F>, Expression<F>)>,
    ) -> usize {
        let mut cells = VirtualCells::new(self);
        let table_map = table_map(&mut cells);
        for (input, _) in table_map.iter() {
            assert!(
                !input.contains_simple_selector(),
                "simple selectors cannot be used in lookup \"{name}\""
            );
        }
        self.lookups.push(lookup::Argument::new(name, table_map));
        self.lookups.len() - 1
    }

    /// Degree of the constraint system: the largest degree among the gates
    /// and the arguments.
    pub fn degree(&self) -> usize {
        let mut degree = self.permutation.required_degree();
        degree = max(
            degree,
            self.lookups
                .iter()
                .map(|lookup| lookup.required_degree())
                .max()
                .unwrap_or(1),
        );
        degree = max(
            degree,
            self.gates
                .iter()
                .flat_map(|gate| gate.polys.iter().map(|poly| poly.degree()))
                .max()
                .unwrap_or(0),
        );
        max(degree, self.minimum_degree.unwrap_or(1))
    }

    /// Number of trailing rows filled with randomness.
    pub fn blinding_factors(&self) -> usize {
        // Advice columns are opened at most this many times by the gates.
        let factors = *self.num_advice_queries.iter().max().unwrap_or(&1);
        // The permutation argument opens its products at three points.
        let factors = max(3, factors);
        // One more opening in the multi-open argument,
        let factors = factors + 1;
        // and one against off-by-one errors.
        factors + 1
    }

    /// Smallest number of rows a circuit needs.
    pub fn minimum_rows(&self) -> usize {
        // the blinding rows, l_last, l_0 and at least one usable row
        self.blinding_factors() + 1 + 1 + 1
    }

    /// The phases used by the advice columns, in order.
    pub fn phases(&self) -> Vec<u8> {
        let max_phase = self.advice_column_phase.iter().max().copied().unwrap_or(0);
        (0..=max_phase).collect()
    }

    /// Turns the selectors into fixed columns, combining disjoint simple
    /// selectors into shared columns when this does not raise the degree.
    /// Returns the new system and the values of the new fixed columns.
    ///
    /// # Panics
    ///
    /// Panics if `selectors` does not hold one activation vector per
    /// selector.
    pub fn compress_selectors(mut self, selectors: Vec<Vec<bool>>) -> (Self, Vec<Vec<F>>) {
        assert_eq!(selectors.len(), self.num_selectors);

        // Degree of the gates each simple selector gates. Complex selectors
        // and unused ones stay at 0.
        let mut degrees = vec![0; selectors.len()];
        for expr in self.gates.iter().flat_map(|gate| gate.polys.iter()) {
            if let Some(selector) = expr.extract_simple_selector() {
                degrees[selector.index()] = max(degrees[selector.index()], expr.degree());
            }
        }

        let max_degree = self.degree();

        let descriptions = selectors
            .into_iter()
            .zip(degrees)
            .enumerate()
            .map(|(selector, (activations, max_degree))| SelectorDescription {
                selector,
                activations,
                max_degree,
            })
            .collect();

        let mut new_columns = vec![];
        let (polys, assignments) = selector_compressor::process(descriptions, max_degree, || {
            let column = self.fixed_column();
            new_columns.push(column);
            Expression::Fixed(FixedQuery {
                index: self.query_fixed_index(column, Rotation::cur()),
                column_index: column.index(),
                rotation: Rotation::cur(),
            })
        });

        let mut selector_map = vec![None; assignments.len()];
        let mut replacements = vec![None; assignments.len()];
        for assignment in assignments {
            selector_map[assignment.selector] = Some(new_columns[assignment.combination_index]);
            replacements[assignment.selector] = Some(assignment.expression);
        }
        self.selector_map = selector_map.into_iter().flatten().collect();
        let replacements: Vec<_> = replacements.into_iter().flatten().collect();
        assert_eq!(replacements.len(), self.num_selectors);
        self.replace_selectors_with_fixed(&replacements);

        (self, polys)
    }

    /// Gives every selector its own fixed column.
    pub fn directly_convert_selectors_to_fixed(
        mut self,
        selectors: Vec<Vec<bool>>,
    ) -> (Self, Vec<Vec<F>>) {
        assert_eq!(selectors.len(), self.num_selectors);

        let polys: Vec<Vec<F>> = selectors
            .iter()
            .map(|activations| {
                activations
                    .iter()
                    .map(|&active| if active { F::one() } else { F::zero() })
                    .collect()
            })
            .collect();

        let replacements: Vec<_> = (0..selectors.len())
            .map(|_| {
                let column = self.fixed_column();
                self.selector_map.push(column);
                Expression::Fixed(FixedQuery {
                    index: self.query_fixed_index(column, Rotation::cur()),
                    column_index: column.index(),
                    rotation: Rotation::cur(),
                })
            })
            .collect();
        self.replace_selectors_with_fixed(&replacements);

        (self, polys)
    }

    fn replace_selectors_with_fixed(&mut self, replacements: &[Expression<F>]) {
        for gate in self.gates.iter_mut() {
            for poly in gate.polys.iter_mut() {
                *poly = poly.replace_selectors(&|selector| replacements[selector.index()].clone());
            }
        }
        for lookup in self.lookups.iter_mut() {
            lookup.replace_selectors(&|selector| {
                assert!(
                    !selector.is_simple(),
                    "simple selectors cannot be used in lookups"
                );
                replacements[selector.index()].clone()
            });
        }
    }

    pub fn num_fixed_columns(&self) -> usize {
        self.num_fixed_columns
    }

    pub fn num_advice_columns(&self) -> usize {
        self.num_advice_columns
    }

    pub fn num_instance_columns(&self) -> usize {
        self.num_instance_columns
    }

    pub fn num_selectors(&self) -> usize {
        self.num_selectors
    }

    pub fn num_challenges(&self) -> usize {
        self.num_challenges
    }

    pub fn advice_column_phase(&self) -> &[u8] {
        &self.advice_column_phase
    }

    pub fn challenge_phase(&self) -> &[u8] {
        &self.challenge_phase
    }

    pub fn selector_map(&self) -> &[Column<Fixed>] {
        &self.selector_map
    }

    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    pub fn advice_queries(&self) -> &[(Column<Advice>, Rotation)] {
        &self.advice_queries
    }

    pub fn num_advice_queries(&self) -> &[usize] {
        &self.num_advice_queries
    }

    pub fn instance_queries(&self) -> &[(Column<Instance>, Rotation)] {
        &self.instance_queries
    }

    pub fn fixed_queries(&self) -> &[(Column<Fixed>, Rotation)] {
        &self.fixed_queries
    }

    pub fn permutation(&self) -> &permutation::Argument {
        &self.permutation
    }

    pub fn lookups(&self) -> &[lookup::Argument<F>] {
        &self.lookups
    }

    pub fn minimum_degree(&self) -> Option<usize> {
        self.minimum_degree
    }
}
