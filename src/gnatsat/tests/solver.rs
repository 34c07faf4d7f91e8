//! Whole-solver properties, checked against a brute-force oracle on
//! small instances.

use gnatsat::{lbool, BasicSimpSolver, BasicSolver, SolverInterface};

/// MiniSat-style deterministic LCG, so failures reproduce.
struct Rng(f64);

impl Rng {
    fn new(seed: f64) -> Self {
        Rng(seed)
    }
    fn drand(&mut self) -> f64 {
        self.0 *= 1389796.0;
        let q = (self.0 / 2147483647.0) as i64;
        self.0 -= q as f64 * 2147483647.0;
        self.0 / 2147483647.0
    }
    fn irand(&mut self, size: i32) -> i32 {
        (self.drand() * size as f64) as i32
    }
}

/// Random k-CNF over `n` vars with `m` clauses.
fn random_cnf(rng: &mut Rng, n: i32, m: usize, k: usize) -> Vec<Vec<i32>> {
    let mut clauses = vec![];
    for _ in 0..m {
        let mut c = vec![];
        for _ in 0..k {
            let v = rng.irand(n) + 1;
            let sign = if rng.drand() < 0.5 { 1 } else { -1 };
            c.push(v * sign);
        }
        clauses.push(c);
    }
    clauses
}

/// Brute-force satisfiability over `n` variables.
fn oracle_sat(clauses: &[Vec<i32>], n: u32) -> bool {
    assert!(n <= 20);
    'models: for m in 0..(1u32 << n) {
        for c in clauses {
            let sat = c.iter().any(|&l| {
                let bit = (m >> (l.abs() - 1)) & 1 == 1;
                if l > 0 {
                    bit
                } else {
                    !bit
                }
            });
            if !sat {
                continue 'models;
            }
        }
        return true;
    }
    false
}

fn check_model_satisfies<S: SolverInterface>(s: &S, clauses: &[Vec<i32>]) {
    let model = s.get_model();
    for c in clauses {
        let sat = c.iter().any(|&l| {
            let v = model
                .get((l.abs() - 1) as usize)
                .copied()
                .unwrap_or(lbool::UNDEF);
            (v ^ (l < 0)) == lbool::TRUE
        });
        assert!(sat, "model does not satisfy clause {:?}", c);
    }
}

#[test]
fn test_core_solver_matches_oracle() {
    let mut rng = Rng::new(91648253.0);
    let n = 6;
    for round in 0..300 {
        let m = 4 + (round % 26);
        let clauses = random_cnf(&mut rng, n, m, 3);
        let expected = oracle_sat(&clauses, n as u32);

        let mut s = BasicSolver::default();
        s.add_clauses(clauses.iter());
        let res = s.solve();
        assert_eq!(
            res,
            lbool::from(expected),
            "oracle disagrees on {:?}",
            clauses
        );
        if expected {
            check_model_satisfies(&s, &clauses);
        }
    }
}

#[test]
fn test_simplifying_solver_matches_oracle() {
    let mut rng = Rng::new(71236521.0);
    let n = 6;
    for round in 0..300 {
        let m = 4 + (round % 26);
        let clauses = random_cnf(&mut rng, n, m, 3);
        let expected = oracle_sat(&clauses, n as u32);

        let mut s = BasicSimpSolver::default();
        s.add_clauses(clauses.iter());
        let ok = s.simplify(3);
        if !ok {
            assert!(!expected, "simplify claimed unsat on {:?}", clauses);
            continue;
        }
        let res = s.solve();
        assert_eq!(
            res,
            lbool::from(expected),
            "oracle disagrees after simplify on {:?}",
            clauses
        );
        if expected {
            // the model is extended over eliminated variables and must
            // satisfy every clause ever added
            check_model_satisfies(&s, &clauses);
        }
    }
}

#[test]
fn test_witness_round_trip() {
    // extend an externally produced model of the simplified formula;
    // it must satisfy the original formula
    let mut rng = Rng::new(30014921.0);
    let n = 6;
    let mut checked = 0;
    for round in 0..200 {
        let m = 4 + (round % 20);
        let clauses = random_cnf(&mut rng, n, m, 3);
        if !oracle_sat(&clauses, n as u32) {
            continue;
        }

        let mut s = BasicSimpSolver::default();
        s.add_clauses(clauses.iter());
        assert!(s.simplify(3));

        // collect the simplified formula through the traversal API
        let mut simplified: Vec<Vec<i32>> = vec![];
        s.traverse_clauses(&mut |c| {
            simplified.push(c.iter().map(|l| l.as_int()).collect());
            true
        });

        // brute-force a model of the simplified formula
        let mut model = vec![lbool::UNDEF; n as usize];
        let found = (0..(1u32 << n)).find(|&mvec| {
            simplified.iter().all(|c| {
                c.iter().any(|&l| {
                    let bit = (mvec >> (l.abs() - 1)) & 1 == 1;
                    if l > 0 {
                        bit
                    } else {
                        !bit
                    }
                })
            })
        });
        let mvec = found.expect("simplification must preserve satisfiability");
        for i in 0..n as usize {
            model[i] = lbool::from((mvec >> i) & 1 == 1);
        }

        // replay the witness log backward
        s.extend_model(&mut model);
        for c in &clauses {
            let sat = c.iter().any(|&l| {
                let v = model[(l.abs() - 1) as usize];
                (v ^ (l < 0)) == lbool::TRUE
            });
            assert!(
                sat,
                "extended model fails clause {:?} of {:?}",
                c, clauses
            );
        }
        checked += 1;
    }
    assert!(checked > 20, "not enough satisfiable samples");
}

#[test]
fn test_incremental_equivalence() {
    // solving F1, adding clauses, and solving F2 must agree with
    // solving F2 from scratch
    let mut rng = Rng::new(55511234.0);
    let n = 6;
    for round in 0..150 {
        let m1 = 4 + (round % 12);
        let m2 = 2 + (round % 8);
        let f1 = random_cnf(&mut rng, n, m1, 3);
        let f2 = random_cnf(&mut rng, n, m2, 3);

        let mut inc = BasicSolver::default();
        inc.add_clauses(f1.iter());
        let _ = inc.solve();
        inc.add_clauses(f2.iter());
        let incremental = inc.solve();

        let mut scratch = BasicSolver::default();
        scratch.add_clauses(f1.iter().chain(f2.iter()));
        let fresh = scratch.solve();

        assert_eq!(
            incremental, fresh,
            "incremental vs scratch mismatch on {:?} + {:?}",
            f1, f2
        );
    }
}

#[test]
fn test_simplify_never_changes_status() {
    let mut rng = Rng::new(77712345.0);
    let n = 6;
    for round in 0..200 {
        let m = 4 + (round % 24);
        let clauses = random_cnf(&mut rng, n, m, 3);

        let mut plain = BasicSolver::default();
        plain.add_clauses(clauses.iter());
        let expected = plain.solve();

        let mut simp = BasicSimpSolver::default();
        simp.add_clauses(clauses.iter());
        let ok = simp.simplify(2);
        let got = if ok { simp.solve() } else { lbool::FALSE };
        assert_eq!(expected, got, "status changed by simplify on {:?}", clauses);
    }
}

#[test]
fn test_learner_reports_match_solved_run() {
    use std::{cell::RefCell, rc::Rc};

    let mut rng = Rng::new(99917777.0);
    let n = 7;
    let mut saw_learnt = false;
    for round in 0..60 {
        let m = 20 + (round % 16);
        let clauses = random_cnf(&mut rng, n, m, 3);

        let reported: Rc<RefCell<Vec<Vec<i32>>>> = Rc::default();
        let buf: Rc<RefCell<Vec<i32>>> = Rc::default();
        let (reported2, buf2) = (reported.clone(), buf.clone());

        let mut s = BasicSolver::default();
        s.connect_learner(
            |len| len <= 3,
            move |lit| {
                if lit == 0 {
                    reported2.borrow_mut().push(buf2.borrow_mut().split_off(0));
                } else {
                    buf2.borrow_mut().push(lit);
                }
            },
        );
        s.add_clauses(clauses.iter());
        let _ = s.solve();

        // the sentinel closed every reported clause
        assert!(buf.borrow().is_empty());
        for c in reported.borrow().iter() {
            assert!(c.len() <= 3, "length filter was ignored: {:?}", c);
            assert!(!c.is_empty());
            saw_learnt = true;
        }
    }
    assert!(saw_learnt, "no run learned any short clause");
}

#[test]
fn test_tautologies_and_duplicates_are_tolerated() {
    let mut s = BasicSolver::default();
    s.add_clause(&[1, -1, 2]); // tautology, absorbed
    s.add_clause(&[3, 3, 4]); // duplicate literal
    assert_eq!(s.solve(), lbool::TRUE);
    let model_sat = |s: &BasicSolver, l: i32| s.value_of_int(l) == lbool::TRUE;
    assert!(model_sat(&s, 3) || model_sat(&s, 4));
}
