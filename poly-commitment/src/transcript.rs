//! A Fiat-Shamir transcript built on personalised Blake2b-512.
//!
//! Every absorbed item is prefixed by a one byte tag, and every squeeze
//! absorbs its own tag before hashing a copy of the running state, so that
//! consecutive squeezes without intermediate writes still differ.
//!
//! Scalars are absorbed and written as their canonical little-endian bytes.
//! Points are absorbed as both affine coordinates but written compressed,
//! see [crate::commitment].

use crate::commitment::CommitmentCurve;
use ark_ff::PrimeField;
use blake2::{
    digest::{
        core_api::{Buffer, UpdateCore, VariableOutputCore},
        Output,
    },
    Blake2bVarCore,
};
use plonkish_utils::FieldHelpers;
use std::{
    io::{self, Read, Write},
    marker::PhantomData,
};

/// Tag absorbed before squeezing a challenge
const BLAKE2B_PREFIX_CHALLENGE: u8 = 0;
/// Tag absorbed before a commitment
const BLAKE2B_PREFIX_POINT: u8 = 1;
/// Tag absorbed before a scalar
const BLAKE2B_PREFIX_SCALAR: u8 = 2;

/// Blake2b personalisation of proof transcripts
pub const TRANSCRIPT_PERSONALIZATION: &[u8; 16] = b"Halo2-Transcript";

/// Blake2b-512 with a personalisation string, which is part of the
/// parameter block rather than of the hashed data.
#[derive(Clone)]
pub struct Blake2bState {
    core: Blake2bVarCore,
    buffer: Buffer<Blake2bVarCore>,
}

impl Blake2bState {
    pub fn new(personalization: &[u8; 16]) -> Self {
        Self {
            core: Blake2bVarCore::new_with_params(&[], personalization, 0, 64),
            buffer: Buffer::<Blake2bVarCore>::default(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        let Self { core, buffer } = self;
        buffer.digest_blocks(data, |blocks| core.update_blocks(blocks));
    }

    pub fn finalize(mut self) -> [u8; 64] {
        let mut out = Output::<Blake2bVarCore>::default();
        self.core.finalize_variable_core(&mut self.buffer, &mut out);
        let mut digest = [0u8; 64];
        digest.copy_from_slice(&out);
        digest
    }
}

/// Operations shared by the prover and the verifier side.
pub trait Transcript<F, C> {
    /// Squeezes a challenge from the current state.
    fn squeeze_challenge(&mut self) -> F;

    /// Absorbs a commitment that both sides already know.
    fn common_point(&mut self, point: C) -> io::Result<()>;

    /// Absorbs a scalar that both sides already know.
    fn common_scalar(&mut self, scalar: F) -> io::Result<()>;
}

/// Verifier side: items are read from the proof and absorbed.
pub trait TranscriptRead<F, C>: Transcript<F, C> {
    fn read_point(&mut self) -> io::Result<C>;

    fn read_scalar(&mut self) -> io::Result<F>;

    fn read_n_points(&mut self, n: usize) -> io::Result<Vec<C>> {
        (0..n).map(|_| self.read_point()).collect()
    }

    fn read_n_scalars(&mut self, n: usize) -> io::Result<Vec<F>> {
        (0..n).map(|_| self.read_scalar()).collect()
    }
}

/// Prover side: items are absorbed and written to the proof.
pub trait TranscriptWrite<F, C>: Transcript<F, C> {
    fn write_point(&mut self, point: C) -> io::Result<()>;

    fn write_scalar(&mut self, scalar: F) -> io::Result<()>;
}

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn scalar_size<F: PrimeField>() -> usize {
    ((F::MODULUS_BIT_SIZE + 7) / 8) as usize
}

fn scalar_bytes<F: PrimeField>(scalar: F) -> Vec<u8> {
    let mut bytes = scalar.to_bytes();
    bytes.resize(scalar_size::<F>(), 0);
    bytes
}

fn squeeze<F: PrimeField>(state: &mut Blake2bState) -> F {
    state.update(&[BLAKE2B_PREFIX_CHALLENGE]);
    let result = state.clone().finalize();
    F::from_le_bytes_mod_order(&result)
}

fn absorb_scalar<F: PrimeField>(state: &mut Blake2bState, scalar: F) -> Vec<u8> {
    let bytes = scalar_bytes(scalar);
    state.update(&[BLAKE2B_PREFIX_SCALAR]);
    state.update(&bytes);
    bytes
}

fn absorb_point<C: CommitmentCurve>(state: &mut Blake2bState, point: &C) -> io::Result<()> {
    let (x, y) = point
        .to_coordinates()
        .ok_or_else(|| invalid_data("cannot absorb the point at infinity"))?;
    state.update(&[BLAKE2B_PREFIX_POINT]);
    state.update(&scalar_bytes(x));
    state.update(&scalar_bytes(y));
    Ok(())
}

/// Reads a proof produced by [Blake2bWrite].
#[derive(Clone)]
pub struct Blake2bRead<R, F, C> {
    state: Blake2bState,
    reader: R,
    _marker: PhantomData<(F, C)>,
}

impl<R: Read, F, C> Blake2bRead<R, F, C> {
    pub fn init(reader: R) -> Self {
        Self {
            state: Blake2bState::new(TRANSCRIPT_PERSONALIZATION),
            reader,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying reader, e.g. to check it has been consumed.
    pub fn finalize(self) -> R {
        self.reader
    }
}

impl<R, F, C> Transcript<F, C> for Blake2bRead<R, F, C>
where
    R: Read,
    F: PrimeField,
    C: CommitmentCurve,
{
    fn squeeze_challenge(&mut self) -> F {
        squeeze(&mut self.state)
    }

    fn common_point(&mut self, point: C) -> io::Result<()> {
        absorb_point(&mut self.state, &point)
    }

    fn common_scalar(&mut self, scalar: F) -> io::Result<()> {
        absorb_scalar(&mut self.state, scalar);
        Ok(())
    }
}

impl<R, F, C> TranscriptRead<F, C> for Blake2bRead<R, F, C>
where
    R: Read,
    F: PrimeField,
    C: CommitmentCurve,
{
    fn read_point(&mut self) -> io::Result<C> {
        let mut bytes = vec![0u8; C::COMPRESSED_SIZE];
        self.reader.read_exact(&mut bytes)?;
        let point = C::from_compressed(&bytes)
            .ok_or_else(|| invalid_data("invalid point encoding in proof"))?;
        self.common_point(point)?;
        Ok(point)
    }

    fn read_scalar(&mut self) -> io::Result<F> {
        let mut bytes = vec![0u8; scalar_size::<F>()];
        self.reader.read_exact(&mut bytes)?;
        let scalar =
            F::from_bytes(&bytes).map_err(|_| invalid_data("invalid field element encoding in proof"))?;
        self.common_scalar(scalar)?;
        Ok(scalar)
    }
}

/// Writes a proof that [Blake2bRead] can replay.
#[derive(Clone)]
pub struct Blake2bWrite<W, F, C> {
    state: Blake2bState,
    writer: W,
    _marker: PhantomData<(F, C)>,
}

impl<W: Write, F, C> Blake2bWrite<W, F, C> {
    pub fn init(writer: W) -> Self {
        Self {
            state: Blake2bState::new(TRANSCRIPT_PERSONALIZATION),
            writer,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying writer holding the proof bytes.
    pub fn finalize(self) -> W {
        self.writer
    }
}

impl<W, F, C> Transcript<F, C> for Blake2bWrite<W, F, C>
where
    W: Write,
    F: PrimeField,
    C: CommitmentCurve,
{
    fn squeeze_challenge(&mut self) -> F {
        squeeze(&mut self.state)
    }

    fn common_point(&mut self, point: C) -> io::Result<()> {
        absorb_point(&mut self.state, &point)
    }

    fn common_scalar(&mut self, scalar: F) -> io::Result<()> {
        absorb_scalar(&mut self.state, scalar);
        Ok(())
    }
}

impl<W, F, C> TranscriptWrite<F, C> for Blake2bWrite<W, F, C>
where
    W: Write,
    F: PrimeField,
    C: CommitmentCurve,
{
    fn write_point(&mut self, point: C) -> io::Result<()> {
        self.common_point(point)?;
        self.writer.write_all(&point.to_compressed())
    }

    fn write_scalar(&mut self, scalar: F) -> io::Result<()> {
        let bytes = absorb_scalar(&mut self.state, scalar);
        self.writer.write_all(&bytes)
    }
}
