//! Test framework: key generation, proving and verification of circuits
//! over BN254 with KZG commitments and a Blake2b transcript.

use crate::{
    circuits::assignment::Circuit,
    error::{ProverError, VerifyError},
    keygen::{keygen_pk, keygen_vk_custom},
    keys::ProvingKey,
    proof::Proof,
    prover::create_proof,
    verifier::verify_proof,
};
use ark_bn254::{Bn254, Fr, G1Affine};
use ark_ff::UniformRand;
use plonkish_utils::tests::make_test_rng;
use poly_commitment::{
    kzg::KzgParams,
    transcript::{Blake2bRead, Blake2bWrite},
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::time::Instant;

pub(crate) type Params = KzgParams<Bn254>;
pub(crate) type ProofWriter = Blake2bWrite<Vec<u8>, Fr, G1Affine>;
pub(crate) type ProofReader<'a> = Blake2bRead<&'a [u8], Fr, G1Affine>;

/// The instance columns of every circuit of a proof, by value.
pub(crate) type Instances = Vec<Vec<Vec<Fr>>>;

/// Calls `f` with `instances` borrowed the way the prover and verifier take
/// them.
pub(crate) fn with_instances<T>(instances: &Instances, f: impl FnOnce(&[&[&[Fr]]]) -> T) -> T {
    let columns: Vec<Vec<&[Fr]>> = instances
        .iter()
        .map(|circuit| circuit.iter().map(Vec::as_slice).collect())
        .collect();
    let circuits: Vec<&[&[Fr]]> = columns.iter().map(Vec::as_slice).collect();
    f(&circuits)
}

pub(crate) struct TestFramework<C> {
    k: u32,
    circuits: Vec<C>,
    instances: Instances,
    compress_selectors: bool,
    seed: Option<[u8; 32]>,
}

pub(crate) struct TestRunner<C> {
    params: Params,
    pk: ProvingKey<Fr, G1Affine>,
    circuits: Vec<C>,
    instances: Instances,
}

impl<C: Circuit<Fr>> TestFramework<C> {
    pub(crate) fn new(k: u32) -> Self {
        TestFramework {
            k,
            circuits: vec![],
            instances: vec![],
            compress_selectors: true,
            seed: None,
        }
    }

    /// Adds a circuit to the proof, together with its instance columns.
    #[must_use]
    pub(crate) fn circuit(mut self, circuit: C, instance: Vec<Vec<Fr>>) -> Self {
        self.circuits.push(circuit);
        self.instances.push(instance);
        self
    }

    #[must_use]
    pub(crate) fn compress_selectors(mut self, compress_selectors: bool) -> Self {
        self.compress_selectors = compress_selectors;
        self
    }

    #[must_use]
    pub(crate) fn seed(mut self, seed: [u8; 32]) -> Self {
        self.seed = Some(seed);
        self
    }

    /// creates the parameters and the keys
    #[must_use]
    pub(crate) fn setup(self) -> TestRunner<C> {
        let _ = env_logger::builder().is_test(true).try_init();
        assert!(!self.circuits.is_empty(), "a proof needs at least one circuit");

        let start = Instant::now();
        let mut rng = make_test_rng(self.seed);
        let s = Fr::rand(&mut rng);
        // the toxic waste comes from the test rng
        let params = unsafe { Params::unsafe_setup(self.k, s) }.unwrap();

        let vk = keygen_vk_custom(&params, &self.circuits[0], self.compress_selectors).unwrap();
        let pk = keygen_pk(&params, vk, &self.circuits[0]).unwrap();
        println!("- time to create keys: {:?}ms", start.elapsed().as_millis());

        TestRunner {
            params,
            pk,
            circuits: self.circuits,
            instances: self.instances,
        }
    }
}

impl<C: Circuit<Fr>> TestRunner<C> {
    pub(crate) fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn pk(&self) -> &ProvingKey<Fr, G1Affine> {
        &self.pk
    }

    pub(crate) fn circuits(&self) -> &[C] {
        &self.circuits
    }

    pub(crate) fn instances(&self) -> &Instances {
        &self.instances
    }

    /// Creates a proof with the instances given at setup.
    pub(crate) fn prove(&self) -> Result<Vec<u8>, ProverError> {
        self.prove_with(&self.instances)
    }

    pub(crate) fn prove_with(&self, instances: &Instances) -> Result<Vec<u8>, ProverError> {
        let start = Instant::now();
        let rng = ChaCha20Rng::seed_from_u64(0);
        let mut transcript = ProofWriter::init(vec![]);
        with_instances(instances, |instances| {
            create_proof(
                &self.params,
                &self.pk,
                &self.circuits,
                instances,
                rng,
                &mut transcript,
            )
        })?;
        println!("- time to create proof: {:?}ms", start.elapsed().as_millis());
        Ok(transcript.finalize())
    }

    /// Verifies `proof` against the instances given at setup.
    pub(crate) fn verify(&self, proof: &[u8]) -> Result<Proof<Fr, G1Affine>, VerifyError> {
        self.verify_with(proof, &self.instances)
    }

    pub(crate) fn verify_with(
        &self,
        proof: &[u8],
        instances: &Instances,
    ) -> Result<Proof<Fr, G1Affine>, VerifyError> {
        let start = Instant::now();
        let mut transcript = ProofReader::init(proof);
        let proof = with_instances(instances, |instances| {
            verify_proof(&self.params, self.pk.vk(), instances, &mut transcript)
        })?;
        assert!(
            transcript.finalize().is_empty(),
            "the verifier must consume the whole proof"
        );
        println!("- time to verify: {}ms", start.elapsed().as_millis());
        Ok(proof)
    }

    /// Create and verify a proof
    pub(crate) fn prove_and_verify(&self) -> Result<Proof<Fr, G1Affine>, String> {
        let proof = self.prove().map_err(|e| e.to_string())?;
        self.verify(&proof).map_err(|e| e.to_string())
    }
}
