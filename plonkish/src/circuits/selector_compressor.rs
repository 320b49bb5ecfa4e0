//! Packs simple selectors with disjoint activations into shared fixed
//! columns.
//!
//! A column combining `k` selectors holds the value `i` (1-based) on the
//! rows where the `i`-th selector is active and 0 elsewhere. Selector `i`
//! is then recovered as `q * prod_{j != i} (j - q)`, which raises the degree
//! of its gates by `k - 1`. Selectors are only combined while their gates
//! stay within the degree of the constraint system.

use crate::circuits::expr::Expression;
use ark_ff::Field;
use std::cmp::max;

/// A selector together with its activations and the degree of the gates
/// it multiplies.
#[derive(Clone, Debug)]
pub struct SelectorDescription {
    pub selector: usize,
    pub activations: Vec<bool>,
    /// Degree of the largest gate the selector multiplies, including the
    /// selector itself. 0 when the selector multiplies no gate in the
    /// simple way.
    pub max_degree: usize,
}

/// Where a selector ended up.
#[derive(Clone, Debug)]
pub struct SelectorAssignment<F> {
    pub selector: usize,
    /// Index of the combined column among the returned columns
    pub combination_index: usize,
    /// Expression replacing the selector
    pub expression: Expression<F>,
}

/// Combines the selectors, calling `allocate_fixed_column` once per combined
/// column. Returns the column values and one assignment per selector.
///
/// # Panics
///
/// Panics if a selector's gates already exceed `max_degree`.
pub fn process<F, E>(
    mut selectors: Vec<SelectorDescription>,
    max_degree: usize,
    mut allocate_fixed_column: E,
) -> (Vec<Vec<F>>, Vec<SelectorAssignment<F>>)
where
    F: Field,
    E: FnMut() -> Expression<F>,
{
    if selectors.is_empty() {
        return (vec![], vec![]);
    }

    let n = selectors[0].activations.len();
    let mut combination_assignments = vec![];
    let mut selector_assignments = vec![];

    // Selectors not used as simple gate factors keep a column of their own.
    selectors.retain(|selector| {
        if selector.max_degree != 0 {
            return true;
        }
        let expression = allocate_fixed_column();
        let column = selector
            .activations
            .iter()
            .map(|&active| if active { F::one() } else { F::zero() })
            .collect();
        selector_assignments.push(SelectorAssignment {
            selector: selector.selector,
            combination_index: combination_assignments.len(),
            expression,
        });
        combination_assignments.push(column);
        false
    });

    // exclusion[i][j] for j < i: the two selectors share an active row
    let exclusion: Vec<Vec<bool>> = selectors
        .iter()
        .enumerate()
        .map(|(i, rhs)| {
            selectors[..i]
                .iter()
                .map(|lhs| {
                    rhs.activations
                        .iter()
                        .zip(lhs.activations.iter())
                        .any(|(a, b)| *a && *b)
                })
                .collect()
        })
        .collect();

    let mut added = vec![false; selectors.len()];
    for (i, selector) in selectors.iter().enumerate() {
        if added[i] {
            continue;
        }
        added[i] = true;
        assert!(
            selector.max_degree <= max_degree,
            "selector {} gates a polynomial of degree {} above {max_degree}",
            selector.selector,
            selector.max_degree,
        );

        // Largest gate degree in the combination, without its selector
        let mut d = selector.max_degree - 1;
        let mut combination = vec![selector];
        let mut combination_added = vec![i];

        'candidates: for (j, candidate) in selectors.iter().enumerate().skip(i + 1) {
            if d + combination.len() == max_degree {
                break;
            }
            if added[j] {
                continue;
            }
            for &k in combination_added.iter() {
                if exclusion[j][k] {
                    continue 'candidates;
                }
            }
            let new_d = max(d, candidate.max_degree - 1);
            if new_d + combination.len() + 1 > max_degree {
                continue;
            }
            d = new_d;
            combination.push(candidate);
            combination_added.push(j);
            added[j] = true;
        }

        let combination_len = combination.len();
        let combination_index = combination_assignments.len();
        let query = allocate_fixed_column();
        let mut column = vec![F::zero(); n];

        let mut assigned_root = F::one();
        for selector in combination {
            let mut expression = query.clone();
            let mut root = F::one();
            for _ in 0..combination_len {
                if root != assigned_root {
                    expression = expression * (Expression::Constant(root) - query.clone());
                }
                root += F::one();
            }
            selector_assignments.push(SelectorAssignment {
                selector: selector.selector,
                combination_index,
                expression,
            });

            for (value, &active) in column.iter_mut().zip(selector.activations.iter()) {
                if active {
                    *value = assigned_root;
                }
            }
            assigned_root += F::one();
        }
        combination_assignments.push(column);
    }

    (combination_assignments, selector_assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{
        expr::Evaluator,
        query::{AdviceQuery, Challenge, FixedQuery, InstanceQuery, Rotation, Selector},
    };
    use ark_bn254::Fr;
    use proptest::prelude::*;

    fn fixed(index: usize) -> Expression<Fr> {
        Expression::Fixed(FixedQuery {
            index,
            column_index: index,
            rotation: Rotation::cur(),
        })
    }

    /// Evaluates an expression made of constants and a single fixed column.
    struct FixedValue(Fr);

    impl Evaluator<Fr> for FixedValue {
        type Output = Fr;

        fn constant(&self, value: Fr) -> Fr {
            value
        }
        fn selector(&self, _: Selector) -> Fr {
            unreachable!()
        }
        fn fixed(&self, _: FixedQuery) -> Fr {
            self.0
        }
        fn advice(&self, _: AdviceQuery) -> Fr {
            unreachable!()
        }
        fn instance(&self, _: InstanceQuery) -> Fr {
            unreachable!()
        }
        fn challenge(&self, _: Challenge) -> Fr {
            unreachable!()
        }
        fn negated(&self, a: Fr) -> Fr {
            -a
        }
        fn sum(&self, a: Fr, b: Fr) -> Fr {
            a + b
        }
        fn product(&self, a: Fr, b: Fr) -> Fr {
            a * b
        }
        fn scaled(&self, a: Fr, scalar: Fr) -> Fr {
            a * scalar
        }
    }

    fn run(
        selectors: Vec<SelectorDescription>,
        max_degree: usize,
    ) -> (Vec<Vec<Fr>>, Vec<SelectorAssignment<Fr>>) {
        let mut next = 0;
        process(selectors, max_degree, || {
            next += 1;
            fixed(next - 1)
        })
    }

    #[test]
    fn test_unused_selector_keeps_own_column() {
        let (columns, assignments) = run(
            vec![SelectorDescription {
                selector: 0,
                activations: vec![true, false, true],
                max_degree: 0,
            }],
            3,
        );
        assert_eq!(columns, vec![vec![Fr::from(1u64), Fr::from(0u64), Fr::from(1u64)]]);
        assert_eq!(assignments[0].expression, fixed(0));
    }

    #[test]
    fn test_overlapping_selectors_are_not_combined() {
        let (columns, assignments) = run(
            vec![
                SelectorDescription {
                    selector: 0,
                    activations: vec![true, true],
                    max_degree: 2,
                },
                SelectorDescription {
                    selector: 1,
                    activations: vec![false, true],
                    max_degree: 2,
                },
            ],
            4,
        );
        assert_eq!(columns.len(), 2);
        assert_eq!(assignments[0].combination_index, 0);
        assert_eq!(assignments[1].combination_index, 1);
    }

    #[test]
    fn test_degree_bound_limits_combination() {
        // three disjoint selectors of degree 2, room for only two per column
        let selectors = (0..3)
            .map(|i| SelectorDescription {
                selector: i,
                activations: (0..3).map(|row| row == i).collect(),
                max_degree: 2,
            })
            .collect();
        let (columns, assignments) = run(selectors, 3);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], vec![Fr::from(1u64), Fr::from(2u64), Fr::from(0u64)]);
        assert_eq!(columns[1], vec![Fr::from(0u64), Fr::from(0u64), Fr::from(1u64)]);
        // q * (2 - q) for the first selector
        assert_eq!(
            assignments[0].expression,
            fixed(0) * (Expression::Constant(Fr::from(2u64)) - fixed(0))
        );
        assert_eq!(assignments[2].expression, fixed(1));
    }

    proptest! {
        #[test]
        fn test_replacement_selects_exactly_its_rows(
            rows in proptest::collection::vec(0usize..4, 1..12)
        ) {
            // rows[r] = which of 4 selectors is active on row r, at most one
            let selectors: Vec<_> = (0..4)
                .map(|i| SelectorDescription {
                    selector: i,
                    activations: rows.iter().map(|&s| s == i).collect(),
                    max_degree: 1,
                })
                .collect();
            let (columns, assignments) = run(selectors, 8);

            for assignment in assignments.iter() {
                let column = &columns[assignment.combination_index];
                for (row, &active) in rows.iter().enumerate() {
                    let result = assignment.expression.evaluate(&FixedValue(column[row]));
                    let expected_nonzero = active == assignment.selector;
                    prop_assert_eq!(result != Fr::from(0u64), expected_nonzero);
                }
            }
        }
    }
}
