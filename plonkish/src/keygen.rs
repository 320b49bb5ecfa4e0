//! Key generation: synthesizes the circuit once to record its fixed
//! columns, selectors and copy constraints.

use crate::{
    circuits::{
        assignment::{Assignment, Circuit},
        column::{Advice, Any, Column, Fixed, Instance},
        constraint_system::ConstraintSystem,
        domains::EvaluationDomains,
        query::{Challenge, Selector},
        value::Value,
    },
    error::{SetupError, SynthesisError},
    keys::{ProvingKey, VerifyingKey},
    permutation,
};
use plonkish_utils::CircuitField;
use poly_commitment::PolynomialCommitmentScheme;
use rayon::prelude::*;
use std::ops::Range;

/// The [Assignment] backend of key generation. Advice cells are ignored.
#[derive(Debug)]
pub(crate) struct Assembly<F> {
    k: u32,
    fixed: Vec<Vec<F>>,
    pub(crate) permutation: permutation::Assembly,
    pub(crate) selectors: Vec<Vec<bool>>,
    usable_rows: Range<usize>,
}

impl<F: CircuitField> Assembly<F> {
    fn new(k: u32, cs: &ConstraintSystem<F>) -> Self {
        let n = 1 << k;
        Assembly {
            k,
            fixed: vec![vec![F::zero(); n]; cs.num_fixed_columns()],
            permutation: permutation::Assembly::new(n, cs.permutation()),
            selectors: vec![vec![false; n]; cs.num_selectors()],
            usable_rows: 0..n - (cs.blinding_factors() + 1),
        }
    }

    fn check_usable(&self, row: usize) -> Result<(), SynthesisError> {
        if self.usable_rows.contains(&row) {
            Ok(())
        } else {
            Err(SynthesisError::NotEnoughRowsAvailable { current_k: self.k })
        }
    }
}

impl<F: CircuitField> Assignment<F> for Assembly<F> {
    fn enable_selector(&mut self, selector: &Selector, row: usize) -> Result<(), SynthesisError> {
        self.check_usable(row)?;
        self.selectors[selector.index()][row] = true;
        Ok(())
    }

    fn query_instance(&self, _: Column<Instance>, row: usize) -> Result<Value<F>, SynthesisError> {
        self.check_usable(row)?;
        Ok(Value::unknown())
    }

    fn assign_advice(&mut self, _: Column<Advice>, _: usize, _: Value<F>) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn assign_fixed(
        &mut self,
        column: Column<Fixed>,
        row: usize,
        to: Value<F>,
    ) -> Result<(), SynthesisError> {
        self.check_usable(row)?;
        let cell = self
            .fixed
            .get_mut(column.index())
            .and_then(|column| column.get_mut(row))
            .ok_or(SynthesisError::BoundsFailure)?;
        *cell = to.assign()?;
        Ok(())
    }

    fn copy(
        &mut self,
        left_column: Column<Any>,
        left_row: usize,
        right_column: Column<Any>,
        right_row: usize,
    ) -> Result<(), SynthesisError> {
        self.check_usable(left_row)?;
        self.check_usable(right_row)?;
        self.permutation
            .copy(left_column, left_row, right_column, right_row)
    }

    fn fill_from_row(
        &mut self,
        column: Column<Fixed>,
        from_row: usize,
        to: Value<F>,
    ) -> Result<(), SynthesisError> {
        self.check_usable(from_row)?;
        let filler = to.assign()?;
        let column = self
            .fixed
            .get_mut(column.index())
            .ok_or(SynthesisError::BoundsFailure)?;
        for row in self.usable_rows.clone().skip(from_row) {
            column[row] = filler;
        }
        Ok(())
    }

    fn get_challenge(&self, _: Challenge) -> Value<F> {
        Value::unknown()
    }
}

/// Configures the circuit and creates domains fitting its degree.
fn create_domains<F, C>(k: u32) -> Result<(EvaluationDomains<F>, ConstraintSystem<F>, C::Config), SetupError>
where
    F: CircuitField,
    C: Circuit<F>,
{
    let mut cs = ConstraintSystem::default();
    let config = C::configure(&mut cs);
    let domains = EvaluationDomains::create(k, cs.degree())?;
    Ok((domains, cs, config))
}

/// Synthesizes the circuit into a fresh [Assembly] and turns its selectors
/// into fixed columns.
#[allow(clippy::type_complexity)]
pub(crate) fn synthesize<F, C>(
    k: u32,
    circuit: &C,
    compress_selectors: bool,
) -> Result<(EvaluationDomains<F>, ConstraintSystem<F>, Assembly<F>), SetupError>
where
    F: CircuitField,
    C: Circuit<F>,
{
    let (domains, cs, config) = create_domains::<F, C>(k)?;
    let n = domains.n();
    if n < cs.minimum_rows() {
        return Err(SetupError::NotEnoughRows(n, cs.minimum_rows()));
    }

    let mut assembly = Assembly::new(k, &cs);
    circuit.synthesize(config, &mut assembly)?;

    let selectors = assembly.selectors.clone();
    let (cs, selector_polys) = if compress_selectors {
        cs.compress_selectors(selectors)
    } else {
        cs.directly_convert_selectors_to_fixed(selectors)
    };
    assembly.fixed.extend(selector_polys);
    debug_assert_eq!(assembly.fixed.len(), cs.num_fixed_columns());

    Ok((domains, cs, assembly))
}

/// Generates a verifying key, combining simple selectors into shared fixed
/// columns.
pub fn keygen_vk<F, P, C>(params: &P, circuit: &C) -> Result<VerifyingKey<F, P::Commitment>, SetupError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    C: Circuit<F>,
{
    keygen_vk_custom(params, circuit, true)
}

pub fn keygen_vk_custom<F, P, C>(
    params: &P,
    circuit: &C,
    compress_selectors: bool,
) -> Result<VerifyingKey<F, P::Commitment>, SetupError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    C: Circuit<F>,
{
    let (domains, cs, assembly) = synthesize(params.k(), circuit, compress_selectors)?;

    let permutation = assembly.permutation.build_vk(params, &domains)?;
    let fixed_commitments = assembly
        .fixed
        .iter()
        .map(|values| params.commit_lagrange(&domains.lagrange_from_vec(values.clone())))
        .collect::<Result<_, _>>()?;

    log::debug!(
        "generated verifying key: k = {}, degree = {}, {} fixed columns",
        domains.k(),
        cs.degree(),
        cs.num_fixed_columns()
    );
    Ok(VerifyingKey::from_parts(
        domains,
        fixed_commitments,
        permutation,
        cs,
        assembly.selectors,
        compress_selectors,
    ))
}

/// Generates a proving key for the circuit of `vk`.
pub fn keygen_pk<F, P, C>(
    params: &P,
    vk: VerifyingKey<F, P::Commitment>,
    circuit: &C,
) -> Result<ProvingKey<F, P::Commitment>, SetupError>
where
    F: CircuitField,
    P: PolynomialCommitmentScheme<F>,
    C: Circuit<F>,
{
    let (_, cs, assembly) = synthesize(params.k(), circuit, vk.compress_selectors())?;
    let domains = vk.domains();
    let n = domains.n();

    let fixed_values: Vec<_> = assembly
        .fixed
        .into_iter()
        .map(|values| domains.lagrange_from_vec(values))
        .collect();
    let fixed_polys: Vec<_> = fixed_values
        .iter()
        .map(|evals| domains.lagrange_to_coeff(evals.clone()))
        .collect();
    let fixed_cosets = fixed_polys
        .iter()
        .map(|poly| domains.coeff_to_extended(poly))
        .collect();

    let permutation = assembly.permutation.build_pk(domains);

    let blinding_factors = cs.blinding_factors();
    let extended_indicator = |rows: Range<usize>| {
        let mut values = vec![F::zero(); n];
        for row in rows {
            values[row] = F::one();
        }
        domains.coeff_to_extended(&domains.lagrange_to_coeff(domains.lagrange_from_vec(values)))
    };
    // 1 on the first row
    let l0 = extended_indicator(0..1);
    // 1 on the blinding rows
    let l_blind = extended_indicator(n - blinding_factors..n);
    // 1 on the last usable row, right before the blinding rows
    let l_last = extended_indicator(n - blinding_factors - 1..n - blinding_factors);

    let l_active_row = domains.extended_from_vec(
        l_last
            .evals
            .par_iter()
            .zip(l_blind.evals.par_iter())
            .map(|(last, blind)| F::one() - (*last + *blind))
            .collect(),
    );

    log::debug!("generated proving key");
    Ok(ProvingKey::from_parts(
        vk,
        l0,
        l_last,
        l_active_row,
        fixed_values,
        fixed_polys,
        fixed_cosets,
        permutation,
    ))
}
