//! The expression tree describing gate constraints and lookup terms.
//!
//! An [Expression] owns its children: subtrees are never shared, and cloning
//! an expression copies the whole tree. Expressions are walked either by
//! matching on them directly (degree analysis, graph compilation) or through
//! an [Evaluator], which folds the tree bottom-up into any output type.

use crate::circuits::query::{AdviceQuery, Challenge, FixedQuery, InstanceQuery, Selector};
use ark_ff::Field;
use std::{
    iter::{Product, Sum},
    ops::{Add, Mul, Neg, Sub},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression<F> {
    Constant(F),
    Selector(Selector),
    Fixed(FixedQuery),
    Advice(AdviceQuery),
    Instance(InstanceQuery),
    Challenge(Challenge),
    Negated(Box<Expression<F>>),
    Sum(Box<Expression<F>>, Box<Expression<F>>),
    Product(Box<Expression<F>>, Box<Expression<F>>),
    Scaled(Box<Expression<F>>, F),
}

/// Folds an expression tree into a value of type `Output`, leaves first.
pub trait Evaluator<F> {
    type Output;

    fn constant(&self, value: F) -> Self::Output;
    fn selector(&self, selector: Selector) -> Self::Output;
    fn fixed(&self, query: FixedQuery) -> Self::Output;
    fn advice(&self, query: AdviceQuery) -> Self::Output;
    fn instance(&self, query: InstanceQuery) -> Self::Output;
    fn challenge(&self, challenge: Challenge) -> Self::Output;
    fn negated(&self, a: Self::Output) -> Self::Output;
    fn sum(&self, a: Self::Output, b: Self::Output) -> Self::Output;
    fn product(&self, a: Self::Output, b: Self::Output) -> Self::Output;
    fn scaled(&self, a: Self::Output, scalar: F) -> Self::Output;
}

impl<F: Field> Expression<F> {
    pub fn evaluate<E: Evaluator<F>>(&self, evaluator: &E) -> E::Output {
        match self {
            Expression::Constant(c) => evaluator.constant(*c),
            Expression::Selector(s) => evaluator.selector(*s),
            Expression::Fixed(q) => evaluator.fixed(*q),
            Expression::Advice(q) => evaluator.advice(*q),
            Expression::Instance(q) => evaluator.instance(*q),
            Expression::Challenge(c) => evaluator.challenge(*c),
            Expression::Negated(a) => {
                let a = a.evaluate(evaluator);
                evaluator.negated(a)
            }
            Expression::Sum(a, b) => {
                let a = a.evaluate(evaluator);
                let b = b.evaluate(evaluator);
                evaluator.sum(a, b)
            }
            Expression::Product(a, b) => {
                let a = a.evaluate(evaluator);
                let b = b.evaluate(evaluator);
                evaluator.product(a, b)
            }
            Expression::Scaled(a, scalar) => {
                let a = a.evaluate(evaluator);
                evaluator.scaled(a, *scalar)
            }
        }
    }

    /// Degree of the polynomial this expression stands for, in the column
    /// polynomials.
    pub fn degree(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Challenge(_) => 0,
            Expression::Selector(_)
            | Expression::Fixed(_)
            | Expression::Advice(_)
            | Expression::Instance(_) => 1,
            Expression::Negated(a) | Expression::Scaled(a, _) => a.degree(),
            Expression::Sum(a, b) => std::cmp::max(a.degree(), b.degree()),
            Expression::Product(a, b) => a.degree() + b.degree(),
        }
    }

    /// Approximate cost of evaluating the expression.
    pub fn complexity(&self) -> usize {
        match self {
            Expression::Constant(_) | Expression::Challenge(_) => 0,
            Expression::Selector(_)
            | Expression::Fixed(_)
            | Expression::Advice(_)
            | Expression::Instance(_) => 1,
            Expression::Negated(a) => a.complexity() + 5,
            Expression::Sum(a, b) => a.complexity() + b.complexity() + 15,
            Expression::Product(a, b) => a.complexity() + b.complexity() + 30,
            Expression::Scaled(a, _) => a.complexity() + 30,
        }
    }

    pub fn square(self) -> Self {
        self.clone() * self
    }

    pub fn contains_simple_selector(&self) -> bool {
        match self {
            Expression::Selector(selector) => selector.is_simple(),
            Expression::Negated(a) | Expression::Scaled(a, _) => a.contains_simple_selector(),
            Expression::Sum(a, b) | Expression::Product(a, b) => {
                a.contains_simple_selector() || b.contains_simple_selector()
            }
            _ => false,
        }
    }

    /// Returns the simple selector gating this expression, if any.
    ///
    /// # Panics
    ///
    /// Panics if the expression contains two simple selectors.
    pub fn extract_simple_selector(&self) -> Option<Selector> {
        self.evaluate(&SimpleSelectorExtractor)
    }

    /// Replaces every selector with the expression returned by `replacement`.
    pub fn replace_selectors(&self, replacement: &impl Fn(Selector) -> Expression<F>) -> Self {
        match self {
            Expression::Selector(selector) => replacement(*selector),
            Expression::Negated(a) => -a.replace_selectors(replacement),
            Expression::Sum(a, b) => a.replace_selectors(replacement) + b.replace_selectors(replacement),
            Expression::Product(a, b) => {
                a.replace_selectors(replacement) * b.replace_selectors(replacement)
            }
            Expression::Scaled(a, scalar) => a.replace_selectors(replacement) * *scalar,
            leaf => leaf.clone(),
        }
    }
}

struct SimpleSelectorExtractor;

impl SimpleSelectorExtractor {
    fn combine(a: Option<Selector>, b: Option<Selector>) -> Option<Selector> {
        match (a, b) {
            (Some(a), None) | (None, Some(a)) => Some(a),
            (Some(_), Some(_)) => panic!("two simple selectors cannot be in the same expression"),
            (None, None) => None,
        }
    }
}

impl<F: Field> Evaluator<F> for SimpleSelectorExtractor {
    type Output = Option<Selector>;

    fn constant(&self, _: F) -> Self::Output {
        None
    }

    fn selector(&self, selector: Selector) -> Self::Output {
        selector.is_simple().then_some(selector)
    }

    fn fixed(&self, _: FixedQuery) -> Self::Output {
        None
    }

    fn advice(&self, _: AdviceQuery) -> Self::Output {
        None
    }

    fn instance(&self, _: InstanceQuery) -> Self::Output {
        None
    }

    fn challenge(&self, _: Challenge) -> Self::Output {
        None
    }

    fn negated(&self, a: Self::Output) -> Self::Output {
        a
    }

    fn sum(&self, a: Self::Output, b: Self::Output) -> Self::Output {
        Self::combine(a, b)
    }

    fn product(&self, a: Self::Output, b: Self::Output) -> Self::Output {
        Self::combine(a, b)
    }

    fn scaled(&self, a: Self::Output, _: F) -> Self::Output {
        a
    }
}

impl<F: Field> Neg for Expression<F> {
    type Output = Expression<F>;

    fn neg(self) -> Self::Output {
        Expression::Negated(Box::new(self))
    }
}

impl<F: Field> Add for Expression<F> {
    type Output = Expression<F>;

    fn add(self, rhs: Expression<F>) -> Expression<F> {
        Expression::Sum(Box::new(self), Box::new(rhs))
    }
}

impl<F: Field> Sub for Expression<F> {
    type Output = Expression<F>;

    // a - b is represented as a + (-b)
    fn sub(self, rhs: Expression<F>) -> Expression<F> {
        Expression::Sum(Box::new(self), Box::new(-rhs))
    }
}

impl<F: Field> Mul for Expression<F> {
    type Output = Expression<F>;

    fn mul(self, rhs: Expression<F>) -> Expression<F> {
        Expression::Product(Box::new(self), Box::new(rhs))
    }
}

impl<F: Field> Mul<F> for Expression<F> {
    type Output = Expression<F>;

    fn mul(self, rhs: F) -> Expression<F> {
        Expression::Scaled(Box::new(self), rhs)
    }
}

impl<F: Field> Sum<Self> for Expression<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(|acc, x| acc + x)
            .unwrap_or(Expression::Constant(F::zero()))
    }
}

impl<F: Field> Product<Self> for Expression<F> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(|acc, x| acc * x)
            .unwrap_or(Expression::Constant(F::one()))
    }
}
