//! SHPlonk multi-point opening ([BDFG20](https://eprint.iacr.org/2020/081)).
//!
//! Queries are grouped by polynomial, polynomials are grouped by the set of
//! points they are opened at ("rotation sets"), and a single pair of group
//! elements `(W, W')` proves every opening:
//!
//! - `h(X) = Σ_i v^i Σ_j y^j (p_ij(X) - r_ij(X)) / Z_{S_i}(X)` is committed as `W`,
//! - `L(X) = Σ_i v^i Z_{T \ S_i}(u) Σ_j y^j (p_ij(X) - r_ij(u)) - Z_T(u) h(X)`
//!   vanishes at `u`, and `W' = [L(X) / (X - u)]` (normalised by the first
//!   `Z_{T \ S_0}(u)`) is the second element.
//!
//! The verifier checks `e(W', [s]_2) = e(F + u W', [1]_2)` where `F` is the
//! commitment to the normalised `L(X)` rebuilt from the query commitments.

use crate::{
    commitment::CommitmentCurve,
    kzg::KzgParams,
    transcript::{TranscriptRead, TranscriptWrite},
    utils::{
        add_scaled, div_by_vanishing, eval_polynomial, evaluate_vanishing_polynomial,
        kate_division, lagrange_interpolate, powers,
    },
    CommitmentError, CommitmentReference, Msm, PolynomialCommitmentScheme, ProverQuery,
    VerifierQuery,
};
use ark_ec::pairing::Pairing;
use ark_ff::{Field, One, PrimeField, Zero};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// A query as seen by the grouping logic.
trait Query<F>: Sync {
    type Commitment: PartialEq + Copy + Send + Sync;

    fn point(&self) -> F;
    fn eval(&self) -> F;
    fn commitment(&self) -> Self::Commitment;
}

/// Identifies a prover polynomial by address.
#[derive(Debug, Clone, Copy)]
struct PolynomialPointer<'a, F: PrimeField>(&'a DensePolynomial<F>);

impl<'a, F: PrimeField> PartialEq for PolynomialPointer<'a, F> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'a, F: PrimeField> Query<F> for ProverQuery<'a, F> {
    type Commitment = PolynomialPointer<'a, F>;

    fn point(&self) -> F {
        self.point
    }

    fn eval(&self) -> F {
        self.poly.evaluate(&self.point)
    }

    fn commitment(&self) -> Self::Commitment {
        PolynomialPointer(self.poly)
    }
}

impl<'a, F: PrimeField, C: Copy + Sync + Send> Query<F> for VerifierQuery<'a, F, C> {
    type Commitment = CommitmentReference<'a, F, C>;

    fn point(&self) -> F {
        self.point
    }

    fn eval(&self) -> F {
        self.eval
    }

    fn commitment(&self) -> Self::Commitment {
        self.commitment
    }
}

/// Commitments sharing the same opening points, with their evaluations at
/// each of the points (in the order of `points`).
struct RotationSet<F, C> {
    commitments: Vec<(C, Vec<F>)>,
    points: Vec<F>,
}

struct IntermediateSets<F, C> {
    rotation_sets: Vec<RotationSet<F, C>>,
    super_point_set: BTreeSet<F>,
}

/// Groups the queries. The order of the sets, and of the commitments inside
/// a set, only depends on the order of the queries, so that the prover and
/// the verifier agree on it.
fn construct_intermediate_sets<F: PrimeField, Q: Query<F>>(
    queries: &[Q],
) -> IntermediateSets<F, Q::Commitment> {
    let get_eval = |commitment: Q::Commitment, point: F| -> F {
        match queries
            .iter()
            .find(|query| query.commitment() == commitment && query.point() == point)
        {
            Some(query) => query.eval(),
            None => unreachable!("every rotation of a commitment comes from a query"),
        }
    };

    let super_point_set: BTreeSet<F> = queries.iter().map(Q::point).collect();

    // commitment -> points it is opened at
    let mut commitment_rotation_set_map: Vec<(Q::Commitment, BTreeSet<F>)> = vec![];
    for query in queries {
        let point = query.point();
        match commitment_rotation_set_map
            .iter_mut()
            .find(|(commitment, _)| *commitment == query.commitment())
        {
            Some((_, set)) => {
                set.insert(point);
            }
            None => commitment_rotation_set_map.push((query.commitment(), BTreeSet::from([point]))),
        }
    }

    // points -> commitments opened at exactly those points
    let mut rotation_set_commitment_map: Vec<(BTreeSet<F>, Vec<Q::Commitment>)> = vec![];
    for (commitment, set) in commitment_rotation_set_map {
        match rotation_set_commitment_map
            .iter_mut()
            .find(|(other, _)| *other == set)
        {
            Some((_, commitments)) => {
                if !commitments.contains(&commitment) {
                    commitments.push(commitment);
                }
            }
            None => rotation_set_commitment_map.push((set, vec![commitment])),
        }
    }

    let rotation_sets = rotation_set_commitment_map
        .into_par_iter()
        .map(|(set, commitments)| {
            let points: Vec<F> = set.into_iter().collect();
            let commitments = commitments
                .into_iter()
                .map(|commitment| {
                    let evals = points
                        .iter()
                        .map(|point| get_eval(commitment, *point))
                        .collect();
                    (commitment, evals)
                })
                .collect();
            RotationSet {
                commitments,
                points,
            }
        })
        .collect();

    IntermediateSets {
        rotation_sets,
        super_point_set,
    }
}

/// Writes `W` and `W'` for `queries` to the transcript.
pub fn create_proof<E, T>(
    params: &KzgParams<E>,
    queries: &[ProverQuery<'_, E::ScalarField>],
    transcript: &mut T,
) -> Result<(), CommitmentError>
where
    E: Pairing,
    E::G1Affine: CommitmentCurve,
    T: TranscriptWrite<E::ScalarField, E::G1Affine>,
{
    if queries.is_empty() {
        return Err(CommitmentError::EmptyQueries);
    }

    let y: E::ScalarField = transcript.squeeze_challenge();

    let IntermediateSets {
        rotation_sets,
        super_point_set,
    } = construct_intermediate_sets(queries);

    // low degree equivalents r_ij(X), interpolating p_ij on S_i
    let low_degree: Vec<Vec<Vec<E::ScalarField>>> = rotation_sets
        .par_iter()
        .map(|set| {
            set.commitments
                .iter()
                .map(|(_, evals)| lagrange_interpolate(&set.points, evals))
                .collect()
        })
        .collect();

    let v: E::ScalarField = transcript.squeeze_challenge();

    let quotients: Vec<Vec<E::ScalarField>> = rotation_sets
        .par_iter()
        .zip(low_degree.par_iter())
        .map(|(set, low_degree)| {
            // N_i(X) = Σ_j y^j (p_ij(X) - r_ij(X))
            let mut numerator = vec![];
            for (((pointer, _), r), power_of_y) in
                set.commitments.iter().zip(low_degree).zip(powers(y))
            {
                add_scaled(&mut numerator, &pointer.0.coeffs, power_of_y);
                add_scaled(&mut numerator, r, -power_of_y);
            }
            div_by_vanishing(numerator, &set.points)
        })
        .collect();

    let mut h_x = vec![];
    for (quotient, power_of_v) in quotients.iter().zip(powers(v)) {
        add_scaled(&mut h_x, quotient, power_of_v);
    }
    let h = params.commit(&DensePolynomial::from_coefficients_vec(h_x.clone()))?;
    transcript.write_point(h)?;

    let u: E::ScalarField = transcript.squeeze_challenge();

    let contributions: Vec<(Vec<E::ScalarField>, E::ScalarField)> = rotation_sets
        .par_iter()
        .zip(low_degree.par_iter())
        .map(|(set, low_degree)| {
            let diffs: Vec<E::ScalarField> = super_point_set
                .iter()
                .filter(|point| !set.points.contains(point))
                .copied()
                .collect();
            let z_i = evaluate_vanishing_polynomial(&diffs, u);

            // L_i(X) = Σ_j y^j (p_ij(X) - r_ij(u))
            let mut l_x = vec![];
            for (((pointer, _), r), power_of_y) in
                set.commitments.iter().zip(low_degree).zip(powers(y))
            {
                let mut inner = pointer.0.coeffs.clone();
                if inner.is_empty() {
                    inner.push(E::ScalarField::zero());
                }
                inner[0] -= eval_polynomial(r, u);
                add_scaled(&mut l_x, &inner, power_of_y);
            }
            for coeff in l_x.iter_mut() {
                *coeff *= z_i;
            }
            (l_x, z_i)
        })
        .collect();

    let mut l_x = vec![];
    for ((contribution, _), power_of_v) in contributions.iter().zip(powers(v)) {
        add_scaled(&mut l_x, contribution, power_of_v);
    }
    let zt_eval = evaluate_vanishing_polynomial(
        &super_point_set.iter().copied().collect::<Vec<_>>(),
        u,
    );
    add_scaled(&mut l_x, &h_x, -zt_eval);
    debug_assert!(eval_polynomial(&l_x, u).is_zero());

    let mut w = kate_division(&l_x, u);
    let z_0_diff_inv = contributions[0]
        .1
        .inverse()
        .ok_or(CommitmentError::DegenerateChallenge)?;
    for coeff in w.iter_mut() {
        *coeff *= z_0_diff_inv;
    }
    let w = params.commit(&DensePolynomial::from_coefficients_vec(w))?;
    transcript.write_point(w)?;

    log::trace!(
        "shplonk opening: {} queries in {} rotation sets",
        queries.len(),
        rotation_sets.len()
    );
    Ok(())
}

/// Reads `W` and `W'` from the transcript and checks them against `queries`.
pub fn verify_proof<E, T>(
    params: &KzgParams<E>,
    queries: &[VerifierQuery<'_, E::ScalarField, E::G1Affine>],
    transcript: &mut T,
) -> Result<bool, CommitmentError>
where
    E: Pairing,
    E::G1Affine: CommitmentCurve,
    T: TranscriptRead<E::ScalarField, E::G1Affine>,
{
    if queries.is_empty() {
        return Err(CommitmentError::EmptyQueries);
    }

    let IntermediateSets {
        rotation_sets,
        super_point_set,
    } = construct_intermediate_sets(queries);

    let y: E::ScalarField = transcript.squeeze_challenge();
    let v: E::ScalarField = transcript.squeeze_challenge();
    let h1 = transcript.read_point()?;
    let u: E::ScalarField = transcript.squeeze_challenge();
    let h2 = transcript.read_point()?;

    let mut z_0_diff_inverse = E::ScalarField::zero();
    let mut z_0 = E::ScalarField::zero();
    let mut outer_msm = Msm::new();
    let mut r_outer_acc = E::ScalarField::zero();

    for (i, (set, power_of_v)) in rotation_sets.iter().zip(powers(v)).enumerate() {
        let diffs: Vec<E::ScalarField> = super_point_set
            .iter()
            .filter(|point| !set.points.contains(point))
            .copied()
            .collect();
        let mut z_diff_i = evaluate_vanishing_polynomial(&diffs, u);

        // normalise by the coefficient of the first set
        if i == 0 {
            z_0 = evaluate_vanishing_polynomial(&set.points, u);
            z_0_diff_inverse = match z_diff_i.inverse() {
                Some(inv) => inv,
                None => return Ok(false),
            };
            z_diff_i = E::ScalarField::one();
        } else {
            z_diff_i *= z_0_diff_inverse;
        }

        let mut inner_msm = Msm::new();
        let mut r_inner_acc = E::ScalarField::zero();
        for ((commitment, evals), power_of_y) in set.commitments.iter().zip(powers(y)) {
            let r_x = lagrange_interpolate(&set.points, evals);
            r_inner_acc += power_of_y * eval_polynomial(&r_x, u);
            match commitment {
                CommitmentReference::Commitment(c) => inner_msm.append_term(power_of_y, **c),
                CommitmentReference::Msm(msm) => {
                    let mut msm = (*msm).clone();
                    msm.scale(power_of_y);
                    inner_msm.add_msm(&msm);
                }
            }
        }
        inner_msm.scale(power_of_v * z_diff_i);
        outer_msm.add_msm(&inner_msm);
        r_outer_acc += power_of_v * r_inner_acc * z_diff_i;
    }

    outer_msm.append_term(-r_outer_acc, params.g[0]);
    outer_msm.append_term(-z_0, h1);
    outer_msm.append_term(u, h2);

    Ok(params.pairing_check(h2, params.eval_msm(&outer_msm)))
}
