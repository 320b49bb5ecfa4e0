//! A Fibonacci circuit: three advice columns `a, b, c` with `a + b = c` on
//! every row, each row copying the two previous sums into `a, b`. The two
//! starting values and the result are instance cells.
//!
//! With the parameters of `KzgParams::unsafe_setup(4, 2)` the keys and the
//! challenges match those computed by other halo2 provers for this circuit.

use super::framework::{with_instances, Instances, ProofWriter, TestFramework};
use crate::{
    argument_data::ArgumentData,
    blinder::Blinder,
    circuits::{
        assignment::{AssignedCell, Assignment, Circuit},
        column::{Advice, Column, Instance},
        constraint_system::ConstraintSystem,
        query::{Rotation, Selector},
    },
    error::{ProverError, SynthesisError, VerifyError},
    keygen::{keygen_vk, keygen_vk_custom, synthesize},
};
use ark_bn254::Fr;
use ark_ff::Field;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const K: u32 = 4;
const ROWS: usize = 8;

#[derive(Clone, Copy, Debug)]
pub(crate) struct FibonacciConfig {
    a: Column<Advice>,
    b: Column<Advice>,
    c: Column<Advice>,
    s: Selector,
    instance: Column<Instance>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FibonacciCircuit;

impl Circuit<Fr> for FibonacciCircuit {
    type Config = FibonacciConfig;

    fn configure(meta: &mut ConstraintSystem<Fr>) -> FibonacciConfig {
        let a = meta.advice_column();
        let b = meta.advice_column();
        let c = meta.advice_column();
        let s = meta.selector();
        let instance = meta.instance_column();

        meta.enable_equality(a);
        meta.enable_equality(b);
        meta.enable_equality(c);
        meta.enable_equality(instance);

        meta.create_gate("add", |meta| {
            let s = meta.query_selector(s);
            let a = meta.query_advice(a, Rotation::cur());
            let b = meta.query_advice(b, Rotation::cur());
            let c = meta.query_advice(c, Rotation::cur());
            vec![s * (a + b - c)]
        });

        FibonacciConfig {
            a,
            b,
            c,
            s,
            instance,
        }
    }

    fn synthesize<A: Assignment<Fr>>(
        &self,
        config: FibonacciConfig,
        assignment: &mut A,
    ) -> Result<(), SynthesisError> {
        assignment.enable_selector(&config.s, 0)?;
        let a = AssignedCell::assign_from_instance(assignment, config.instance, 0, config.a, 0)?;
        let mut prev_b =
            AssignedCell::assign_from_instance(assignment, config.instance, 1, config.b, 0)?;
        let mut prev_c = AssignedCell::assign(assignment, config.c, 0, a.value() + prev_b.value())?;

        for row in 1..ROWS {
            assignment.enable_selector(&config.s, row)?;
            let a = prev_b.copy_advice(assignment, config.a, row)?;
            let b = prev_c.copy_advice(assignment, config.b, row)?;
            let c = AssignedCell::assign(assignment, config.c, row, a.value() + b.value())?;
            // the next row adds the last two sums
            prev_b = prev_c;
            prev_c = c;
        }

        prev_c.constrain_instance(assignment, config.instance, 2)
    }
}

pub(crate) fn fibonacci_instance(a: u64, b: u64, result: u64) -> Vec<Vec<Fr>> {
    vec![vec![Fr::from(a), Fr::from(b), Fr::from(result)]]
}

/// Expands the first `ROWS` rows of a table column, the remaining rows of
/// the column being untouched by the copies.
fn column_with_identity_tail<T: Clone>(column: usize, head: &[T], tail: impl Fn(usize) -> T) -> Vec<T> {
    let n = 1 << K;
    assert_eq!(head.len(), ROWS, "wrong head for column {column}");
    head.iter().cloned().chain((ROWS..n).map(tail)).collect()
}

#[test]
fn test_fibonacci_copy_constraints() {
    let (_, _, assembly) = synthesize::<Fr, _>(K, &FibonacciCircuit, true).unwrap();
    let store = &assembly.permutation;

    let mapping_heads: [[(usize, usize); ROWS]; 4] = [
        [(3, 0), (3, 1), (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6)],
        [(0, 1), (2, 0), (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6)],
        [(0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (1, 7), (3, 2)],
        [(0, 0), (1, 0), (2, 7), (3, 3), (3, 4), (3, 5), (3, 6), (3, 7)],
    ];
    let aux_heads: [[(usize, usize); ROWS]; 4] = [
        [(0, 0), (1, 0), (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6)],
        [(1, 0), (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7)],
        [(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7), (2, 7)],
        [(0, 0), (1, 0), (2, 7), (3, 3), (3, 4), (3, 5), (3, 6), (3, 7)],
    ];
    let size_heads: [[usize; ROWS]; 4] = [
        [2, 1, 1, 1, 1, 1, 1, 1],
        [3, 3, 3, 3, 3, 3, 3, 2],
        [1, 1, 1, 1, 1, 1, 1, 2],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ];

    assert_eq!(store.mapping().len(), 4);
    for column in 0..4 {
        let identity = |row: usize| (column, row);
        assert_eq!(
            store.mapping()[column],
            column_with_identity_tail(column, &mapping_heads[column], identity),
            "mapping of column {column}"
        );
        assert_eq!(
            store.aux()[column],
            column_with_identity_tail(column, &aux_heads[column], identity),
            "aux of column {column}"
        );
        assert_eq!(
            store.sizes()[column],
            column_with_identity_tail(column, &size_heads[column], |_| 1),
            "sizes of column {column}"
        );
    }
}

#[test]
fn test_fibonacci_selectors() {
    let (domains, cs, assembly) = synthesize::<Fr, _>(K, &FibonacciCircuit, true).unwrap();
    let n = domains.n();

    assert_eq!(assembly.selectors.len(), 1);
    let expected: Vec<bool> = (0..n).map(|row| row < ROWS).collect();
    assert_eq!(assembly.selectors[0], expected);

    // 3 advice columns queried once each, a single fixed column for the
    // selector and the permutation over 4 columns
    assert_eq!(cs.blinding_factors(), 5);
    assert_eq!(n - (cs.blinding_factors() + 1), 10);
    assert_eq!(cs.num_fixed_columns(), 1);
    assert_eq!(cs.selector_map().len(), 1);
    assert_eq!(cs.degree(), 3);
}

#[test]
fn test_fibonacci_prove_and_verify() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .setup();
    let proof = runner.prove_and_verify().unwrap();

    let cs = runner.pk().vk().cs();
    assert_eq!(proof.advices_commitments_vec.len(), 1);
    assert_eq!(proof.advices_commitments_vec[0].len(), cs.num_advice_columns());
    assert_eq!(proof.advice_evals_vec[0].len(), cs.advice_queries().len());
    assert_eq!(proof.fixed_evals.len(), cs.fixed_queries().len());
    assert!(proof.lookup_product_commitments_vec[0].is_empty());

    // instance columns are evaluated by the verifier, by interpolating the
    // instance values at x
    let domains = runner.pk().vk().domains();
    let x = proof.x;
    let l = domains.l_i_range(x, x.pow([domains.n() as u64]), 0..3);
    let expected = Fr::from(1u64) * l[0] + Fr::from(1u64) * l[1] + Fr::from(55u64) * l[2];
    assert_eq!(proof.instance_evals_vec, vec![vec![expected]]);
}

#[test]
fn test_fibonacci_uncompressed_selectors() {
    TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .compress_selectors(false)
        .seed([7; 32])
        .setup()
        .prove_and_verify()
        .unwrap();
}

#[test]
fn test_fibonacci_wrong_result() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .setup();
    let proof = runner.prove().unwrap();

    // the proof does not hold for another result
    let wrong: Instances = vec![fibonacci_instance(1, 1, 56)];
    assert!(runner.verify_with(&proof, &wrong).is_err());

    // and no proof can be made for it
    let proof = runner.prove_with(&wrong).unwrap();
    assert!(runner.verify_with(&proof, &wrong).is_err());
}

#[test]
fn test_fibonacci_tampered_proof() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .setup();
    let proof = runner.prove().unwrap();
    assert!(runner.verify(&proof).is_ok());

    for position in [0, proof.len() / 3, proof.len() / 2, proof.len() - 1] {
        let mut tampered = proof.clone();
        tampered[position] ^= 1;
        assert!(
            runner.verify(&tampered).is_err(),
            "flipping a bit at byte {position} must be detected"
        );
    }

    let truncated = &proof[..proof.len() - 1];
    assert!(runner.verify(truncated).is_err());

    // cutting into the advice commitments fails while reading them
    assert!(matches!(
        runner.verify(&proof[..16]),
        Err(VerifyError::Transcript(_))
    ));
}

#[test]
fn test_fibonacci_invalid_instances() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .setup();

    // one instance column is expected
    let two_columns: Instances = vec![vec![vec![Fr::from(1u64)], vec![Fr::from(1u64)]]];
    assert!(matches!(
        runner.prove_with(&two_columns),
        Err(ProverError::InvalidInstances)
    ));

    // one set of instances per circuit
    let proof = runner.prove().unwrap();
    let two_circuits: Instances = vec![fibonacci_instance(1, 1, 55), fibonacci_instance(1, 1, 55)];
    assert!(runner.verify_with(&proof, &two_circuits).is_err());

    // only the 10 usable rows can hold instance values
    let too_long: Instances = vec![vec![vec![Fr::from(1u64); 11]]];
    assert!(matches!(
        runner.verify_with(&proof, &too_long),
        Err(VerifyError::InvalidInstances)
    ));
    assert!(matches!(
        runner.prove_with(&too_long),
        Err(ProverError::Synthesis(SynthesisError::InstanceTooLarge))
    ));
}

#[test]
fn test_fibonacci_multiple_circuits() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .circuit(FibonacciCircuit, fibonacci_instance(2, 3, 144))
        .setup();
    let proof = runner.prove_and_verify().unwrap();
    assert_eq!(proof.advices_commitments_vec.len(), 2);
    assert_eq!(proof.permutation_product_commitments_vec.len(), 2);

    // swapping the instances of the two circuits breaks the proof
    let bytes = runner.prove().unwrap();
    let swapped: Instances = runner.instances().iter().rev().cloned().collect();
    assert!(runner.verify_with(&bytes, &swapped).is_err());
}

#[test]
fn test_verifying_key_is_deterministic() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .setup();
    let params = runner.params();

    let first = keygen_vk(params, &FibonacciCircuit).unwrap();
    let second = keygen_vk(params, &FibonacciCircuit).unwrap();
    assert_eq!(first.transcript_repr(), second.transcript_repr());
    assert_eq!(first.transcript_repr(), runner.pk().vk().transcript_repr());
    assert_eq!(first.fixed_commitments(), second.fixed_commitments());

    let uncompressed = keygen_vk_custom(params, &FibonacciCircuit, false).unwrap();
    assert!(first.compress_selectors());
    assert!(!uncompressed.compress_selectors());
    assert_eq!(
        uncompressed.fixed_commitments().len(),
        first.fixed_commitments().len()
    );
}

#[test]
fn test_advice_columns_released() {
    let runner = TestFramework::new(K)
        .circuit(FibonacciCircuit, fibonacci_instance(1, 1, 55))
        .setup();
    let pk = runner.pk();

    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let mut blinder = Blinder::new(&mut rng, pk.vk().cs().blinding_factors());
    let mut transcript = ProofWriter::init(vec![]);
    let mut data = with_instances(runner.instances(), |instances| {
        ArgumentData::create(
            runner.params(),
            pk,
            runner.circuits(),
            instances,
            &mut blinder,
            &mut transcript,
        )
    })
    .unwrap();

    assert_eq!(data.num_circuits(), 1);
    assert!(!data.advice_transformed());
    assert_eq!(data.export_column_tables(pk.fixed_values()).unwrap().len(), 1);

    data.transform_advice(pk.vk().domains());
    assert!(data.advice_transformed());
    assert!(matches!(
        data.export_column_tables(pk.fixed_values()),
        Err(ProverError::AdviceColumnsReleased)
    ));
    assert_eq!(data.export_poly_tables(pk.fixed_polys()).len(), 1);
}

/// Parameters and keys shared with other halo2 provers for this circuit
mod reference {
    use super::*;
    use crate::{keygen::keygen_pk, tests::framework::ProofReader};
    use ark_bn254::{Bn254, Fq, G1Affine};
    use ark_ff::PrimeField;
    use plonkish_utils::FieldHelpers;
    use poly_commitment::{
        kzg::KzgParams,
        transcript::{Transcript, TranscriptRead},
    };

    /// The first commitments of a proof for the instances `1, 1, 55`: the
    /// advice, the permutation products, the random polynomial and the
    /// quotient pieces.
    const PROOF_BYTES: [u8; 320] = [
    0x90, 0xe5, 0x9b, 0xcc, 0x7c, 0xa8, 0x1f, 0x31, 0x2f, 0x2e, 0x5c, 0xf1, 0x3b, 0x2a, 0xb9, 0xcf,
    0xaa, 0x3f, 0x8e, 0xde, 0x0b, 0x60, 0xd1, 0x37, 0x44, 0x9e, 0x84, 0xc4, 0xa0, 0x25, 0x3a, 0x09,
    0x0b, 0xb3, 0x05, 0xae, 0x0b, 0x46, 0xe5, 0x6e, 0xfb, 0x0c, 0x1f, 0x08, 0x25, 0x6f, 0xd6, 0xca,
    0xaf, 0xb2, 0x78, 0xe1, 0x00, 0x52, 0x5c, 0x30, 0x7f, 0x98, 0x4a, 0x7a, 0xa3, 0x09, 0xfe, 0x99,
    0x31, 0x34, 0x06, 0x73, 0x66, 0x4e, 0xab, 0xbb, 0x90, 0xee, 0x5a, 0x34, 0x91, 0x53, 0x82, 0xef,
    0x84, 0xbf, 0x00, 0x94, 0x69, 0xa9, 0x71, 0x18, 0x7a, 0x43, 0xdc, 0x42, 0x4f, 0x6d, 0x6d, 0x91,
    0xd7, 0xb9, 0x14, 0x19, 0x08, 0x5f, 0x41, 0x5e, 0xf1, 0x2f, 0x16, 0xef, 0x3c, 0x9e, 0x0f, 0x32,
    0x30, 0x25, 0x0e, 0xf3, 0xa5, 0xfb, 0xce, 0x71, 0xca, 0xb6, 0x69, 0xd2, 0x14, 0xbc, 0x70, 0xa7,
    0xa0, 0x9a, 0x1a, 0xe8, 0xc3, 0x6d, 0x57, 0xd6, 0x34, 0x77, 0x67, 0x17, 0xf1, 0x22, 0x38, 0x4d,
    0x5d, 0xd4, 0xe6, 0x69, 0x31, 0x5b, 0x67, 0x5a, 0x0b, 0xeb, 0x5c, 0x46, 0x78, 0xf1, 0xbc, 0xa6,
    0x5f, 0x50, 0xe9, 0x18, 0xc5, 0xfa, 0x41, 0x61, 0x90, 0x5a, 0xb4, 0x3f, 0xfd, 0x78, 0x50, 0xa0,
    0x29, 0xd8, 0x29, 0x8a, 0x73, 0x42, 0x90, 0x5b, 0x70, 0x35, 0xc9, 0xca, 0xef, 0x1a, 0x0a, 0x1d,
    0x5e, 0xd0, 0x78, 0xe5, 0x01, 0x0a, 0xd6, 0x36, 0x2f, 0x91, 0x29, 0xad, 0x09, 0xc2, 0xcf, 0xfb,
    0x92, 0xbf, 0x09, 0x44, 0x92, 0x5a, 0xc1, 0x9d, 0x6a, 0x49, 0x4a, 0xb2, 0x36, 0xd9, 0x62, 0x9e,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xdb, 0x9d, 0xab, 0x42, 0x67, 0x51, 0x16, 0xa4, 0x13, 0xbc, 0x38, 0x21, 0x9e, 0xca, 0x0c, 0xc6,
    0x80, 0x6a, 0x17, 0x43, 0x6b, 0x67, 0xa8, 0x6e, 0x0e, 0xb3, 0x5e, 0xa7, 0x0d, 0x3d, 0xb3, 0xa7,
    0x32, 0xf0, 0x7b, 0x97, 0x69, 0x78, 0x65, 0x02, 0x0f, 0xc4, 0xd3, 0x3b, 0xf3, 0xda, 0x31, 0x00,
    0xf5, 0x34, 0x4d, 0xc6, 0xc5, 0x18, 0xa5, 0xa1, 0x25, 0xe4, 0xf6, 0x6c, 0x47, 0x5b, 0x20, 0x85,
    ];

    fn fr(hex: &str) -> Fr {
        Fr::from_hex(hex).unwrap()
    }

    fn point(x: &str, y: &str) -> G1Affine {
        G1Affine::new(Fq::from_hex(x).unwrap(), Fq::from_hex(y).unwrap())
    }

    fn params() -> KzgParams<Bn254> {
        unsafe { KzgParams::<Bn254>::unsafe_setup(K, Fr::from(2u64)) }.unwrap()
    }

    #[test]
    fn test_verifying_key() {
        let vk = keygen_vk(&params(), &FibonacciCircuit).unwrap();

        assert_eq!(
            vk.fixed_commitments(),
            &[point(
                "0x297ff8a661d1fa1196c065b6fb7df901fb16b5b83168ddca6c7749d963cc967a",
                "0x1a7b1f2b5f3e35fc4c706ece6b8f646e95904f9aa417f8a31fd37a41da167ec1",
            )]
        );
        assert_eq!(
            vk.permutation().commitments(),
            &[
                point(
                    "0x28472c5c287afbed2c1cbad418f7736db3be191e735e933e7531f790cc0b454b",
                    "0x2553db7d81ee798baa1b89b83e3cfd5516872410ac1ef7ff8e97801a32f54b22",
                ),
                point(
                    "0x1881f5e53bde69bb20eec1af0e8b17f23f3e49cf6929f13417a5dc389f70acec",
                    "0x19e1cd19519ba4353b95ba5a16a10479eec522952c97acd31199eb96b558b158",
                ),
                point(
                    "0x1a899815b7cb019ce89ac7da39c4c0e071bd042ebffe13965de4e9e1cb968e17",
                    "0x1c2bc1e987ea49a29fa8a6e2168541a29fc27b0150b2b85f8bb2d76e1abd029b",
                ),
                point(
                    "0x02f5f4023c8be80b0fe6ff231b1c292527881597645688da1cbfe83be61bfdc9",
                    "0x0eb912c0ac4f39a2e76c0fb7ac2d3977a4cc909db67680eb9e3c2436f4dc85ae",
                ),
            ]
        );
    }

    #[test]
    fn test_pinned_verifying_key() {
        let vk = keygen_vk(&params(), &FibonacciCircuit).unwrap();
        let pinned = format!("{:?}", vk.pinned());

        assert!(pinned.starts_with(
            "PinnedVerificationKey { \
             base_modulus: \"0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47\", \
             scalar_modulus: \"0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001\", \
             domain: PinnedEvaluationDomain { k: 4, extended_k: 5, \
             omega: 0x21082ca216cbbf4e1c6e4f4594dd508c996dfbe1174efb98b11509c6e306460b }"
        ));
        assert!(pinned.contains(
            "gates: [Product(Fixed { query_index: 0, column_index: 0, rotation: Rotation(0) }, \
             Sum(Sum(Advice { query_index: 0, column_index: 0, rotation: Rotation(0) }, \
             Advice { query_index: 1, column_index: 1, rotation: Rotation(0) }), \
             Negated(Advice { query_index: 2, column_index: 2, rotation: Rotation(0) })))]"
        ));
        assert!(pinned.contains(
            "lookups: [], constants: [], minimum_degree: None }, fixed_commitments: \
             [(0x297ff8a661d1fa1196c065b6fb7df901fb16b5b83168ddca6c7749d963cc967a, \
             0x1a7b1f2b5f3e35fc4c706ece6b8f646e95904f9aa417f8a31fd37a41da167ec1)]"
        ));

        assert_eq!(
            vk.transcript_repr(),
            fr("0x0e149c09b16d13bdc8a09508e1dab4af7399ebe708e0fc37a7fd59d43974596f")
        );
    }

    #[test]
    fn test_first_and_last_row_indicators() {
        let params = params();
        let vk = keygen_vk(&params, &FibonacciCircuit).unwrap();
        let pk = keygen_pk(&params, vk, &FibonacciCircuit).unwrap();
        let domains = pk.vk().domains();
        let n = domains.n();

        // l_first = (1 / n) * sum_j X^j
        let l_first = domains.extended_to_coeff(pk.l0().clone());
        let n_inv = fr("0x2d5e098bb31e86271ccb415b196942d755b0a9c3f21dd9882fa3d63ab1000001");
        assert_eq!(n_inv, domains.d1().size_inv);
        assert!(l_first[..n].iter().all(|c| *c == n_inv));
        assert!(l_first[n..].iter().all(|c| *c == Fr::from(0u64)));

        // the last usable row is row 10
        let l_last = domains.extended_to_coeff(pk.l_last().clone());
        let expected: Vec<Fr> = [
            "0x2d5e098bb31e86271ccb415b196942d755b0a9c3f21dd9882fa3d63ab1000001",
            "0x2014447de15a99b6df03833e95f96ae1299c9ec6ff990b6e75fa3b3b04846a57",
            "0x0f1f5883e65f820d14d56342dc92fd12a944d4cbbdce5377b7439bd07108fc9d",
            "0x02b337de1c8c14f22ec9b9e2f96afef3652627366f8170a0a948dad4ac1bd5e8",
            "0x030644e72e131a029b85045b68181585d2833e84879b9709143e1f593f000000",
            "0x105009f4ffd70672d94cc277eb87ed7bfe9749817a206522cde7ba58eb7b95aa",
            "0x2144f5eefad21e1ca37ae273a4ee5b4a7eef137cbbeb1d198c9e59c37ef70364",
            "0x2db11694c4a58b3789868bd388165969c30dc1120a37fff09a991abf43e42a19",
        ]
        .iter()
        .cycle()
        .take(n)
        .map(|hex| fr(hex))
        .collect();
        assert_eq!(l_last[..n], expected[..]);
    }

    #[test]
    fn test_permutation_labels() {
        let params = params();
        let vk = keygen_vk(&params, &FibonacciCircuit).unwrap();
        let pk = keygen_pk(&params, vk, &FibonacciCircuit).unwrap();
        let permutations = pk.permutation().permutations();

        // a(0) is copied from the first instance cell, labelled delta^3
        assert_eq!(
            permutations[0].evals[0],
            fr("0x18afdf23e9bd9302673fc1e076a492d4d65bd18ebc4d854ed189139bab313e52")
        );
        // b(0) points to a(1), labelled omega
        assert_eq!(permutations[1].evals[0], pk.vk().domains().omega());
        // the first instance cell points back to a(0), labelled 1
        assert_eq!(permutations[3].evals[0], Fr::from(1u64));
    }

    #[test]
    fn test_transcript_challenges() {
        let vk = keygen_vk(&params(), &FibonacciCircuit).unwrap();
        let mut transcript = ProofReader::init(&PROOF_BYTES[..]);

        vk.hash_into(&mut transcript).unwrap();
        for value in [1u64, 1, 55] {
            transcript.common_scalar(Fr::from(value)).unwrap();
        }

        let advice = transcript.read_n_points(3).unwrap();
        assert_eq!(
            advice[0].x,
            Fq::from_le_bytes_mod_order(&{
                let mut bytes = PROOF_BYTES[..32].to_vec();
                bytes[31] &= 0x7f;
                bytes
            })
        );
        let theta: Fr = transcript.squeeze_challenge();
        let beta: Fr = transcript.squeeze_challenge();
        let gamma: Fr = transcript.squeeze_challenge();
        transcript.read_n_points(4).unwrap();
        transcript.read_point().unwrap();
        let y: Fr = transcript.squeeze_challenge();
        transcript.read_n_points(2).unwrap();
        let x: Fr = transcript.squeeze_challenge();
        assert!(transcript.finalize().is_empty());

        assert_eq!(
            theta,
            fr("0x26f0af3189edb2949640abe830c64cafe9b64dabe01919447ce64af067414b17")
        );
        assert_eq!(
            beta,
            fr("0x1fe61de3fc90fc3a44075edf3979b5baa2d04d5bf8ab1b2abcd01e9dbcc602ef")
        );
        assert_eq!(
            gamma,
            fr("0x2c1de10a0bf09aec80c63b700f7c3df55a8d50869b65f110d80e7ae7b59fc822")
        );
        assert_eq!(
            y,
            fr("0x1968fa684fa3c6f3beb4d6311b39e6bfb2938e7bd5da3c0ecb20811550d0334c")
        );
        assert_eq!(
            x,
            fr("0x1d99eef2451a8f49c1a9c4678ede5d6f542baa278555db98b1736941f5f6318d")
        );
    }
}
