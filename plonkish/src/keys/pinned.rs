//! The `Debug` rendering of a verifying key that is hashed into its
//! transcript representation.
//!
//! The rendering follows the one of the halo2 Rust crates, so that a key for
//! the same circuit and parameters gets the same transcript representation,
//! and proofs can be checked by either implementation.

use crate::{
    circuits::{
        column::{Column, ColumnType},
        constraint_system::ConstraintSystem,
        expr::Expression,
        query::Rotation,
    },
    lookup, permutation,
};
use ark_ff::PrimeField;
use plonkish_utils::FieldHelpers;
use poly_commitment::CommitmentCurve;
use std::fmt::{self, Debug, Formatter};

struct Hex<F>(F);

impl<F: PrimeField> Debug for Hex<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

struct Point<'a, C>(&'a C);

impl<'a, C: CommitmentCurve> Debug for Point<'a, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.to_coordinates() {
            None => f.write_str("Infinity"),
            Some((x, y)) => write!(f, "({:?}, {:?})", Hex(x), Hex(y)),
        }
    }
}

struct Points<'a, C>(&'a [C]);

impl<'a, C: CommitmentCurve> Debug for Points<'a, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(Point)).finish()
    }
}

struct Phase(u8);

impl Debug for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Phase").field(&self.0).finish()
    }
}

struct Phases<'a>(&'a [u8]);

impl<'a> Debug for Phases<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|phase| Phase(*phase)))
            .finish()
    }
}

struct Expr<'a, F>(&'a Expression<F>);

fn query<'a, 'b>(
    f: &'a mut Formatter<'b>,
    name: &str,
    index: usize,
    column_index: usize,
    rotation: &Rotation,
) -> fmt::DebugStruct<'a, 'b> {
    let mut debug_struct = f.debug_struct(name);
    debug_struct
        .field("query_index", &index)
        .field("column_index", &column_index)
        .field("rotation", rotation);
    debug_struct
}

impl<'a, F: PrimeField> Debug for Expr<'a, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expression::Constant(value) => f.debug_tuple("Constant").field(&Hex(*value)).finish(),
            Expression::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
            Expression::Fixed(q) => {
                query(f, "Fixed", q.index(), q.column_index(), &q.rotation()).finish()
            }
            Expression::Advice(q) => {
                let mut debug_struct =
                    query(f, "Advice", q.index(), q.column_index(), &q.rotation());
                // the first phase is implicit
                if q.phase() != 0 {
                    debug_struct.field("phase", &Phase(q.phase()));
                }
                debug_struct.finish()
            }
            Expression::Instance(q) => {
                query(f, "Instance", q.index(), q.column_index(), &q.rotation()).finish()
            }
            Expression::Challenge(challenge) => {
                struct Inner(usize, u8);
                impl Debug for Inner {
                    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                        f.debug_struct("Challenge")
                            .field("index", &self.0)
                            .field("phase", &Phase(self.1))
                            .finish()
                    }
                }
                f.debug_tuple("Challenge")
                    .field(&Inner(challenge.index(), challenge.phase()))
                    .finish()
            }
            Expression::Negated(a) => f.debug_tuple("Negated").field(&Expr(a.as_ref())).finish(),
            Expression::Sum(a, b) => f
                .debug_tuple("Sum")
                .field(&Expr(a.as_ref()))
                .field(&Expr(b.as_ref()))
                .finish(),
            Expression::Product(a, b) => f
                .debug_tuple("Product")
                .field(&Expr(a.as_ref()))
                .field(&Expr(b.as_ref()))
                .finish(),
            Expression::Scaled(a, scalar) => f
                .debug_tuple("Scaled")
                .field(&Expr(a.as_ref()))
                .field(&Hex(*scalar))
                .finish(),
        }
    }
}

struct Exprs<'a, F>(&'a [Expression<F>]);

impl<'a, F: PrimeField> Debug for Exprs<'a, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(Expr)).finish()
    }
}

struct Queries<'a, C: ColumnType>(&'a [(Column<C>, Rotation)]);

impl<'a, C: ColumnType> Debug for Queries<'a, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

struct Lookup<'a, F>(&'a lookup::Argument<F>);

impl<'a, F: PrimeField> Debug for Lookup<'a, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.0.name())
            .field("input_expressions", &Exprs(self.0.input_expressions()))
            .field("table_expressions", &Exprs(self.0.table_expressions()))
            .finish()
    }
}

/// Gates are pinned by their polynomials only, flattened across gates.
struct Gates<'a, F>(&'a ConstraintSystem<F>);

impl<'a, F: PrimeField> Debug for Gates<'a, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.0
                    .gates()
                    .iter()
                    .flat_map(|gate| gate.polynomials().iter())
                    .map(Expr),
            )
            .finish()
    }
}

struct PinnedConstraintSystem<'a, F>(&'a ConstraintSystem<F>);

impl<'a, F: PrimeField> Debug for PinnedConstraintSystem<'a, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cs = self.0;
        let lookups: Vec<_> = cs.lookups().iter().map(Lookup).collect();
        let constants: [Column<crate::circuits::column::Fixed>; 0] = [];

        let mut debug_struct = f.debug_struct("PinnedConstraintSystem");
        debug_struct
            .field("num_fixed_columns", &cs.num_fixed_columns())
            .field("num_advice_columns", &cs.num_advice_columns())
            .field("num_instance_columns", &cs.num_instance_columns())
            .field("num_selectors", &cs.num_selectors());
        // phases only show up in multi-phase circuits
        if cs.num_challenges() > 0 {
            debug_struct
                .field("num_challenges", &cs.num_challenges())
                .field("advice_column_phase", &Phases(cs.advice_column_phase()))
                .field("challenge_phase", &Phases(cs.challenge_phase()));
        }
        debug_struct
            .field("gates", &Gates(cs))
            .field("advice_queries", &Queries(cs.advice_queries()))
            .field("instance_queries", &Queries(cs.instance_queries()))
            .field("fixed_queries", &Queries(cs.fixed_queries()))
            .field("permutation", cs.permutation())
            .field("lookups", &lookups)
            .field("constants", &constants)
            .field("minimum_degree", &cs.minimum_degree())
            .finish()
    }
}

struct PermutationKey<'a, C>(&'a permutation::VerifyingKey<C>);

impl<'a, C: CommitmentCurve> Debug for PermutationKey<'a, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("commitments", &Points(self.0.commitments()))
            .finish()
    }
}

/// The parts of a verifying key that determine the circuit.
pub struct PinnedVerificationKey<'a, F, C> {
    pub(crate) k: u32,
    pub(crate) extended_k: u32,
    pub(crate) omega: F,
    pub(crate) cs: &'a ConstraintSystem<F>,
    pub(crate) fixed_commitments: &'a [C],
    pub(crate) permutation: &'a permutation::VerifyingKey<C>,
}

fn modulus<F: PrimeField>() -> String {
    format!("0x{:064x}", F::modulus_biguint())
}

impl<'a, F: PrimeField, C: CommitmentCurve> Debug for PinnedVerificationKey<'a, F, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        struct Domain<F> {
            k: u32,
            extended_k: u32,
            omega: F,
        }

        impl<F: PrimeField> Debug for Domain<F> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct("PinnedEvaluationDomain")
                    .field("k", &self.k)
                    .field("extended_k", &self.extended_k)
                    .field("omega", &Hex(self.omega))
                    .finish()
            }
        }

        f.debug_struct("PinnedVerificationKey")
            .field("base_modulus", &modulus::<C::Base>())
            .field("scalar_modulus", &modulus::<F>())
            .field(
                "domain",
                &Domain {
                    k: self.k,
                    extended_k: self.extended_k,
                    omega: self.omega,
                },
            )
            .field("cs", &PinnedConstraintSystem(self.cs))
            .field("fixed_commitments", &Points(self.fixed_commitments))
            .field("permutation", &PermutationKey(self.permutation))
            .finish()
    }
}
