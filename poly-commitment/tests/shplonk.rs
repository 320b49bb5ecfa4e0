use ark_bn254::{Bn254, Fr, G1Affine};
use ark_ff::{One, UniformRand};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use poly_commitment::{
    kzg::KzgParams,
    transcript::{Blake2bRead, Blake2bWrite},
    Msm, PolynomialCommitmentScheme, ProverQuery, VerifierQuery,
};
use rand::{rngs::StdRng, SeedableRng};

type Writer = Blake2bWrite<Vec<u8>, Fr, G1Affine>;
type Reader<'a> = Blake2bRead<&'a [u8], Fr, G1Affine>;

struct Setup {
    params: KzgParams<Bn254>,
    polys: Vec<DensePolynomial<Fr>>,
    points: Vec<Fr>,
}

fn setup() -> Setup {
    let mut rng = StdRng::seed_from_u64(42);
    let s = Fr::rand(&mut rng);
    let params = unsafe { KzgParams::<Bn254>::unsafe_setup(4, s) }.unwrap();
    let polys = (0..5)
        .map(|_| DensePolynomial::rand(15, &mut rng))
        .collect();
    let points = (0..5).map(|_| Fr::rand(&mut rng)).collect();
    Setup {
        params,
        polys,
        points,
    }
}

/// (polynomial, point) pairs with overlapping and distinct point sets.
const LAYOUT: [(usize, usize); 9] = [
    (0, 0),
    (0, 1),
    (1, 0),
    (1, 1),
    (2, 2),
    (3, 0),
    (3, 3),
    (3, 4),
    (4, 2),
];

fn prove(setup: &Setup) -> Vec<u8> {
    let queries: Vec<_> = LAYOUT
        .iter()
        .map(|&(p, x)| ProverQuery::new(setup.points[x], &setup.polys[p], Fr::from(0u64)))
        .collect();
    let mut transcript = Writer::init(vec![]);
    setup
        .params
        .create_opening_proof(&queries, &mut transcript)
        .unwrap();
    transcript.finalize()
}

fn verify(setup: &Setup, proof: &[u8], tamper: bool) -> bool {
    let commitments: Vec<G1Affine> = setup
        .polys
        .iter()
        .map(|p| setup.params.commit(p).unwrap())
        .collect();
    let queries: Vec<_> = LAYOUT
        .iter()
        .enumerate()
        .map(|(i, &(p, x))| {
            let mut eval = setup.polys[p].evaluate(&setup.points[x]);
            if tamper && i == 4 {
                eval += Fr::one();
            }
            VerifierQuery::new_commitment(&commitments[p], setup.points[x], eval)
        })
        .collect();
    let mut transcript = Reader::init(proof);
    setup
        .params
        .verify_opening_proof(&queries, &mut transcript)
        .unwrap()
}

#[test]
fn test_shplonk_opening() {
    let setup = setup();
    let proof = prove(&setup);
    assert!(verify(&setup, &proof, false));
}

#[test]
fn test_shplonk_rejects_wrong_evaluation() {
    let setup = setup();
    let proof = prove(&setup);
    assert!(!verify(&setup, &proof, true));
}

#[test]
fn test_shplonk_opening_of_msm() {
    let setup = setup();
    let x = setup.points[0];
    let combined = DensePolynomial::from_coefficients_vec(
        setup.polys[0]
            .coeffs
            .iter()
            .zip(setup.polys[1].coeffs.iter())
            .map(|(a, b)| *a + Fr::from(3u64) * b)
            .collect(),
    );
    let queries = vec![
        ProverQuery::new(x, &combined, Fr::from(0u64)),
        ProverQuery::new(setup.points[1], &setup.polys[2], Fr::from(0u64)),
    ];
    let mut transcript = Writer::init(vec![]);
    setup
        .params
        .create_opening_proof(&queries, &mut transcript)
        .unwrap();
    let proof = transcript.finalize();

    let c0 = setup.params.commit(&setup.polys[0]).unwrap();
    let c1 = setup.params.commit(&setup.polys[1]).unwrap();
    let c2 = setup.params.commit(&setup.polys[2]).unwrap();
    let mut msm = Msm::new();
    msm.append_term(Fr::one(), c0);
    msm.append_term(Fr::from(3u64), c1);
    let queries = vec![
        VerifierQuery::new_msm(&msm, x, combined.evaluate(&x)),
        VerifierQuery::new_commitment(&c2, setup.points[1], setup.polys[2].evaluate(&setup.points[1])),
    ];
    let mut transcript = Reader::init(&proof);
    assert!(setup
        .params
        .verify_opening_proof(&queries, &mut transcript)
        .unwrap());
}
