/*****************************************************************************************[simp.rs]
Copyright (c) 2006, Niklas Een, Niklas Sorensson (MiniSat)
Copyright (c) 2007-2010, Niklas Sorensson (MiniSat)
Copyright (c) 2018-2018, Masaki Hara

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
**************************************************************************************************/

use {
    crate::callbacks::Callbacks,
    crate::clause::{
        calc_abstraction, lbool, CRef, ClauseAllocator, ClauseRef, DeletePred, LMap, Lit,
        OccListsData, VMap, Var,
    },
    crate::core::{AddedClause, Solver, SolverOpts},
    crate::interface::SolverInterface,
    std::{fmt, mem, ops, slice},
};

/// CDCL solver with inprocessing.
///
/// Wraps the core `Solver` and adds clause-database simplification:
/// backward subsumption, self-subsuming strengthening, and bounded
/// variable elimination. Eliminating a variable removes every clause it
/// occurs in and replaces them by their resolvents; a witness is pushed
/// for each removed clause so a model of the simplified formula can be
/// extended back to a model of the original one.
///
/// A variable that has been eliminated may no longer appear in new
/// clauses or assumptions: such a call is a caller error and asserts.
/// `freeze` a variable to protect it from elimination when it is going
/// to be used across `simplify` calls.
pub struct SimpSolver<Cb: Callbacks> {
    base: Solver<Cb>,
    opts: SimpOpts,

    frozen: VMap<bool>,
    eliminated: VMap<bool>,
    extension: ExtensionLog,

    // rebuilt from the clause database at each `simplify` call
    occurs: OccListsData<Var, CRef>,
    n_occ: LMap<i32>,
    subsumption_queue: Vec<CRef>,

    // statistics
    eliminated_vars: u64,
    subsumed_clauses: u64,
    strengthened_clauses: u64,
}

/// Knobs for the inprocessing passes.
pub struct SimpOpts {
    /// Allowed increase in the number of clauses when eliminating a
    /// variable. (default 0)
    pub grow: i32,
    /// Never produce resolvents longer than this; -1 means no limit.
    /// (default 20)
    pub clause_lim: i32,
    /// Perform bounded variable elimination at all. (default true)
    pub use_elim: bool,
}

impl Default for SimpOpts {
    fn default() -> Self {
        Self {
            grow: 0,
            clause_lim: 20,
            use_elim: true,
        }
    }
}

impl SimpOpts {
    pub fn check(&self) -> bool {
        self.grow >= 0 && self.clause_lim >= -1
    }
}

/// One extension-witness record: a clause removed by variable
/// elimination together with the literal to satisfy it with when the
/// rest of the clause is false.
///
/// Witnesses form an ordered log. Replayed newest-first against a model
/// of the simplified formula, they reproduce a model of the original
/// formula (see `SimpSolver::extend_model`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    clause: Vec<Lit>,
    witness: Lit,
}

impl Witness {
    /// The removed clause, including the witness literal.
    pub fn clause(&self) -> &[Lit] {
        &self.clause
    }
    /// The literal(s) to set when the clause is not already satisfied.
    pub fn witness(&self) -> &[Lit] {
        slice::from_ref(&self.witness)
    }
    /// The variable this witness recovers.
    pub fn var(&self) -> Var {
        self.witness.var()
    }
}

#[derive(Debug, Clone, Default)]
struct ExtensionLog {
    entries: Vec<Witness>,
}

impl ExtensionLog {
    fn push_clause(&mut self, clause: Vec<Lit>, witness: Lit) {
        debug_assert!(clause.contains(&witness));
        self.entries.push(Witness { clause, witness });
    }

    fn push_unit(&mut self, l: Lit) {
        self.push_clause(vec![l], l);
    }

    /// Replay the log newest-first: whenever a recorded clause is not
    /// satisfied by `model`, make its witness literal true.
    fn extend_model(&self, model: &mut Vec<lbool>) {
        for w in self.entries.iter().rev() {
            let satisfied = w.clause.iter().any(|&l| {
                let idx = l.var().idx() as usize;
                idx < model.len() && (model[idx] ^ !l.sign()) == lbool::TRUE
            });
            if !satisfied {
                let idx = w.witness.var().idx() as usize;
                if idx >= model.len() {
                    model.resize(idx + 1, lbool::UNDEF);
                }
                model[idx] = lbool::new(w.witness.sign());
            }
        }
    }
}

/// Predicate to test whether a clause was deleted from the database
struct ClauseDeleted<'a> {
    ca: &'a ClauseAllocator,
}

impl<'a> DeletePred<CRef> for ClauseDeleted<'a> {
    #[inline]
    fn deleted(&self, cr: &CRef) -> bool {
        self.ca.get_ref(*cr).mark() == 1
    }
}

enum Subsume {
    No,
    Exact,
    /// The literal of the subsuming clause whose negation can be
    /// removed from the subsumed clause.
    Strengthen(Lit),
}

/// `subsume(c, d)` checks whether `c` subsumes `d`, possibly modulo one
/// flipped literal (self-subsuming resolution).
fn subsume(c: ClauseRef, d: ClauseRef) -> Subsume {
    if c.size() > d.size() || (c.abstraction() & !d.abstraction()) != 0 {
        return Subsume::No;
    }
    let mut flip = Lit::UNDEF;
    for &lc in c.lits() {
        let mut found = false;
        for &ld in d.lits() {
            if lc == ld {
                found = true;
                break;
            }
            if lc == !ld {
                if flip != Lit::UNDEF {
                    return Subsume::No;
                }
                flip = lc;
                found = true;
                break;
            }
        }
        if !found {
            return Subsume::No;
        }
    }
    if flip == Lit::UNDEF {
        Subsume::Exact
    } else {
        Subsume::Strengthen(flip)
    }
}

/// Resolve the clauses `p` (containing `v`) and `n` (containing `¬v`)
/// on `v`. Returns `false` if the resolvent is a tautology, otherwise
/// leaves it in `out`.
fn merge(ca: &ClauseAllocator, p: CRef, n: CRef, v: Var, out: &mut Vec<Lit>) -> bool {
    out.clear();
    let ps = ca.get_ref(p).lits();
    let qs = ca.get_ref(n).lits();
    for &q in qs {
        if q.var() != v {
            let mut keep = true;
            for &l in ps {
                if l.var() == q.var() {
                    if l == !q {
                        return false; // tautology
                    }
                    keep = false; // duplicate
                    break;
                }
            }
            if keep {
                out.push(q);
            }
        }
    }
    for &l in ps {
        if l.var() != v {
            out.push(l);
        }
    }
    true
}

impl<Cb: Callbacks + Default> Default for SimpSolver<Cb> {
    fn default() -> Self {
        SimpSolver::new(
            SolverOpts::default(),
            SimpOpts::default(),
            Default::default(),
        )
    }
}

impl<Cb: Callbacks> ops::Deref for SimpSolver<Cb> {
    type Target = Solver<Cb>;
    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
impl<Cb: Callbacks> ops::DerefMut for SimpSolver<Cb> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl<Cb: Callbacks> SimpSolver<Cb> {
    /// Default number of inprocessing rounds for `simplify`.
    pub const DEFAULT_ROUNDS: u32 = 3;

    /// Create a new inprocessing solver with the given options and callbacks.
    pub fn new(opts: SolverOpts, simp_opts: SimpOpts, cb: Cb) -> Self {
        assert!(simp_opts.check());
        let mut base = Solver::new(opts, cb);
        // non-learnt clauses carry their occurrence abstraction
        base.ca_mut().set_extra_clause_field(true);
        Self {
            base,
            opts: simp_opts,
            frozen: VMap::new(),
            eliminated: VMap::new(),
            extension: ExtensionLog::default(),
            occurs: OccListsData::new(),
            n_occ: LMap::new(),
            subsumption_queue: vec![],
            eliminated_vars: 0,
            subsumed_clauses: 0,
            strengthened_clauses: 0,
        }
    }

    /// Solve without assumptions.
    pub fn solve(&mut self) -> lbool {
        self.solve_limited(&[])
    }

    /// Resolve the given non-zero integer into a literal, allocating
    /// variables as needed. Panics on `0` (a usage error).
    pub fn lit_of_int(&mut self, lit: i32) -> Lit {
        assert!(lit != 0, "literal 0 is not a valid literal");
        let v = self.var_of_int((lit.abs() - 1) as u32);
        Lit::new(v, lit > 0)
    }

    /// Add a clause given in the 1-based signed integer form.
    /// Returns `false` if the solver is already in an UNSAT state.
    pub fn add_clause(&mut self, lits: &[i32]) -> bool {
        let mut clause: Vec<Lit> = lits.iter().map(|&l| self.lit_of_int(l)).collect();
        self.add_clause_reuse(&mut clause)
    }

    /// Bulk form of `add_clause`, semantically equal to repeated calls.
    pub fn add_clauses<I>(&mut self, clauses: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<[i32]>,
    {
        for c in clauses {
            self.add_clause(c.as_ref());
        }
        self.is_ok()
    }

    /// Model value of the given non-zero integer literal, after a
    /// satisfiable answer. Covers eliminated variables as well, via the
    /// witness log.
    pub fn value_of_int(&self, lit: i32) -> lbool {
        self.base.value_of_int(lit)
    }

    /// Has `v` been eliminated by a previous `simplify` call?
    pub fn is_eliminated(&self, v: Var) -> bool {
        self.eliminated.has(v) && self.eliminated[v]
    }

    /// Protect `v` from elimination. Must be called before `simplify`
    /// for any variable that will appear in later clauses or
    /// assumptions.
    pub fn freeze(&mut self, v: Var) {
        assert!(!self.is_eliminated(v), "cannot freeze eliminated variable");
        self.frozen.insert_default(v, true);
    }

    /// Release `v` for elimination again.
    pub fn melt(&mut self, v: Var) {
        if self.frozen.has(v) {
            self.frozen[v] = false;
        }
    }

    pub fn is_frozen(&self, v: Var) -> bool {
        self.frozen.has(v) && self.frozen[v]
    }

    /// Number of variables eliminated so far.
    pub fn num_eliminated_vars(&self) -> u64 {
        self.eliminated_vars
    }

    /// Number of witness records in the log.
    pub fn num_witnesses(&self) -> usize {
        self.extension.entries.len()
    }

    /// Run up to `rounds` passes of inprocessing over the clause
    /// database: top-level cleanup, backward subsumption with
    /// self-subsuming strengthening, then bounded variable elimination.
    /// Stops early once a pass finds nothing to do.
    ///
    /// Returns `false` if the clause set was found unsatisfiable.
    /// Satisfiability of the formula is never altered; eliminated
    /// clauses are recoverable through the witness log.
    pub fn simplify(&mut self, rounds: u32) -> bool {
        assert_eq!(
            self.base.decision_level(),
            0,
            "simplify at non-zero decision level"
        );
        debug!("simp.start ({} rounds)", rounds);
        let mut ok = self.base.simplify_db();
        for _round in 0..rounds {
            if !ok {
                break;
            }
            let mut changed = self.build_occurrences();
            ok = self.backward_subsumption(&mut changed);
            if ok && self.opts.use_elim {
                ok = self.eliminate_round(&mut changed);
            }
            if !changed {
                break;
            }
        }
        self.clear_occurrences();
        if ok {
            ok = self.base.simplify_db();
        }
        debug!(
            "simp.done (ok: {}, eliminated: {}, subsumed: {}, strengthened: {})",
            ok, self.eliminated_vars, self.subsumed_clauses, self.strengthened_clauses
        );
        ok
    }

    /// Visit the witness log in reverse insertion order (the order
    /// required to extend a model of the simplified formula). The
    /// visitor receives the removed clause and the witness literals and
    /// returns `false` to stop early; the traversal result is `false`
    /// iff it was stopped.
    pub fn traverse_witnesses_backward<V>(&self, visitor: &mut V) -> bool
    where
        V: FnMut(&[Lit], &[Lit]) -> bool,
    {
        for w in self.witnesses_backward() {
            if !visitor(w.clause(), w.witness()) {
                return false;
            }
        }
        true
    }

    /// Visit the witness log in insertion order.
    pub fn traverse_witnesses_forward<V>(&self, visitor: &mut V) -> bool
    where
        V: FnMut(&[Lit], &[Lit]) -> bool,
    {
        for w in self.witnesses_forward() {
            if !visitor(w.clause(), w.witness()) {
                return false;
            }
        }
        true
    }

    /// Restartable iterator over the witness log, newest first.
    pub fn witnesses_backward(&self) -> impl Iterator<Item = &Witness> {
        self.extension.entries.iter().rev()
    }

    /// Restartable iterator over the witness log, oldest first.
    pub fn witnesses_forward(&self) -> impl Iterator<Item = &Witness> {
        self.extension.entries.iter()
    }

    /// Extend a model of the simplified formula into a model of the
    /// original formula by replaying the witness log in reverse. This is
    /// also applied automatically to the model of a satisfiable
    /// `solve_limited` answer.
    pub fn extend_model(&self, model: &mut Vec<lbool>) {
        self.extension.extend_model(model)
    }

    // ---- inprocessing passes ----

    /// Scan the clause database: drop satisfied clauses, strip
    /// root-false literals, and (re)build the occurrence lists, the
    /// occurrence counts and the subsumption queue.
    fn build_occurrences(&mut self) -> bool {
        self.clear_occurrences();
        for vi in 0..self.base.num_vars() {
            let v = Var::unsafe_from_idx(vi);
            self.occurs.init(v);
            self.n_occ.insert_default(Lit::new(v, true), 0);
            self.n_occ.insert_default(Lit::new(v, false), 0);
            self.frozen.reserve_default(v);
            self.eliminated.reserve_default(v);
        }

        let mut changed = false;
        let crs: Vec<CRef> = self.base.clause_refs().to_vec();
        for cr in crs {
            if self.base.ca().get_ref(cr).mark() == 1 {
                continue;
            }
            let lits: Vec<Lit> = self.base.ca().get_ref(cr).lits().to_vec();
            if lits
                .iter()
                .any(|&l| self.base.raw_value_lit(l) == lbool::TRUE)
            {
                self.base.remove_clause(cr);
                changed = true;
                continue;
            }
            let kept: Vec<Lit> = lits
                .iter()
                .cloned()
                .filter(|&l| self.base.raw_value_lit(l) != lbool::FALSE)
                .collect();
            if kept.len() < lits.len() {
                // propagation ran to fixpoint, so the two watched
                // literals are unassigned and stay in front
                debug_assert!(kept.len() >= 2);
                {
                    let mut c = self.base.ca_mut().get_mut(cr);
                    for (i, &l) in kept.iter().enumerate() {
                        c[i as u32] = l;
                    }
                    c.shrink(kept.len() as u32);
                }
                let abst = calc_abstraction(&kept);
                self.base.ca_mut().get_mut(cr).set_abstraction(abst);
                self.base
                    .ca_mut()
                    .free_amount((lits.len() - kept.len()) as u32);
                changed = true;
            }
            for &l in &kept {
                self.n_occ[l] += 1;
                self.occurs[l.var()].push(cr);
            }
            self.subsumption_queue.push(cr);
        }
        changed
    }

    fn clear_occurrences(&mut self) {
        self.occurs.clear();
        self.n_occ.clear();
        self.subsumption_queue.clear();
    }

    fn occ_total(&self, v: Var) -> i64 {
        self.n_occ[Lit::new(v, true)] as i64 + self.n_occ[Lit::new(v, false)] as i64
    }

    /// Unindex a clause and delete it from the database.
    fn remove_clause_simp(&mut self, cr: CRef) {
        let lits: Vec<Lit> = self.base.ca().get_ref(cr).lits().to_vec();
        for l in lits {
            self.n_occ[l] -= 1;
            self.occurs.smudge(l.var());
        }
        self.base.remove_clause(cr);
    }

    /// Remove the literal `l` from the clause `cr`.
    /// Returns `false` if this made the clause set unsatisfiable.
    fn strengthen_clause(&mut self, cr: CRef, l: Lit) -> bool {
        debug_assert_eq!(self.base.decision_level(), 0);
        let size = self.base.ca().get_ref(cr).size();
        debug_assert!(size > 1);
        trace!("simp.strengthen {:?} (drop {:?})", cr, l);
        if size == 2 {
            // the clause shrinks to a unit; fix it at the root instead
            let lits = self.base.ca().get_ref(cr).lits().to_vec();
            let other = if lits[0] == l {
                lits[1]
            } else {
                debug_assert_eq!(lits[1], l);
                lits[0]
            };
            self.remove_clause_simp(cr);
            if !self.base.enqueue_toplevel(other) {
                return false;
            }
            self.base.propagate_toplevel()
        } else {
            // re-check the shrunk clause against the database later
            self.subsumption_queue.push(cr);
            self.base.detach_clause_strict(cr);
            {
                let c = self.base.ca_mut().get_mut(cr);
                debug_assert!(!c.learnt());
                c.strengthen(l);
            }
            let abst = calc_abstraction(self.base.ca().get_ref(cr).lits());
            self.base.ca_mut().get_mut(cr).set_abstraction(abst);
            self.base.ca_mut().free_amount(1);
            self.base.attach_clause(cr);
            self.n_occ[l] -= 1;
            self.occurs[l.var()].retain(|&x| x != cr);
            true
        }
    }

    /// Backward subsumption over the subsumption queue: each queued
    /// clause removes the clauses it subsumes and strengthens those it
    /// subsumes modulo one flipped literal. Strengthened clauses are
    /// re-queued. Returns `false` on unsatisfiability.
    fn backward_subsumption(&mut self, changed: &mut bool) -> bool {
        let mut qhead = 0;
        while qhead < self.subsumption_queue.len() {
            let cr = self.subsumption_queue[qhead];
            qhead += 1;
            if self.base.ca().get_ref(cr).mark() == 1 {
                continue;
            }

            // scan the occurrence list of the least-occurring variable
            let best = {
                let c = self.base.ca().get_ref(cr);
                let lits = c.lits();
                let mut best = lits[0].var();
                let mut best_occ = self.occ_total(best);
                for &l in &lits[1..] {
                    let o = self.occ_total(l.var());
                    if o < best_occ {
                        best = l.var();
                        best_occ = o;
                    }
                }
                best
            };

            let cands: Vec<CRef> = {
                let pred = ClauseDeleted { ca: self.base.ca() };
                self.occurs.lookup_mut_pred(best, &pred).clone()
            };
            for dr in cands {
                if dr == cr || self.base.ca().get_ref(dr).mark() == 1 {
                    continue;
                }
                let sub = {
                    let ca = self.base.ca();
                    subsume(ca.get_ref(cr), ca.get_ref(dr))
                };
                match sub {
                    Subsume::No => {}
                    Subsume::Exact => {
                        trace!("simp.subsume {:?} by {:?}", dr, cr);
                        self.subsumed_clauses += 1;
                        *changed = true;
                        self.remove_clause_simp(dr);
                    }
                    Subsume::Strengthen(l) => {
                        self.strengthened_clauses += 1;
                        *changed = true;
                        if !self.strengthen_clause(dr, !l) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Try to eliminate every candidate variable, cheapest first.
    /// Returns `false` on unsatisfiability.
    fn eliminate_round(&mut self, changed: &mut bool) -> bool {
        let mut cands: Vec<Var> = (0..self.base.num_vars())
            .map(Var::unsafe_from_idx)
            .filter(|&v| {
                !self.is_frozen(v)
                    && !self.is_eliminated(v)
                    && self.base.raw_value(v) == lbool::UNDEF
                    && self.occ_total(v) > 0
            })
            .collect();
        // cheapest candidates first: fewest potential resolvents
        cands.sort_by_key(|&v| {
            self.n_occ[Lit::new(v, true)] as i64 * self.n_occ[Lit::new(v, false)] as i64
        });

        for v in cands {
            if !self.base.is_ok() {
                return false;
            }
            if !self.eliminate_var(v, changed) {
                return false;
            }
        }
        true
    }

    /// Eliminate `v` by resolution if doing so does not grow the
    /// database past the configured bound. Skipping the variable is not
    /// an error; only unsatisfiability reports `false`.
    fn eliminate_var(&mut self, v: Var, changed: &mut bool) -> bool {
        debug_assert!(!self.is_frozen(v) && !self.is_eliminated(v));
        if self.base.raw_value(v) != lbool::UNDEF {
            // fixed by propagation in the meantime
            return true;
        }

        let cls: Vec<CRef> = {
            let pred = ClauseDeleted { ca: self.base.ca() };
            self.occurs.lookup_mut_pred(v, &pred).clone()
        };
        if cls.is_empty() {
            return true;
        }

        let pos_lit = Lit::new(v, true);
        let mut pos = vec![];
        let mut neg = vec![];
        for &cr in &cls {
            let c = self.base.ca().get_ref(cr);
            if c.lits().contains(&pos_lit) {
                pos.push(cr);
            } else {
                debug_assert!(c.lits().contains(&!pos_lit));
                neg.push(cr);
            }
        }

        // bounded growth check: count non-tautological resolvents
        let mut resolvent = vec![];
        let mut cnt = 0;
        for &p in &pos {
            for &n in &neg {
                if merge(self.base.ca(), p, n, v, &mut resolvent) {
                    cnt += 1;
                    if cnt > cls.len() + self.opts.grow as usize
                        || (self.opts.clause_lim != -1
                            && resolvent.len() > self.opts.clause_lim as usize)
                    {
                        return true; // too expensive, leave `v` in place
                    }
                }
            }
        }

        debug!("simp.eliminate-var {:?} ({} clauses)", v, cls.len());
        *changed = true;

        // record extension witnesses: the smaller side of the
        // occurrence lists, then the default polarity as a unit
        if pos.len() > neg.len() {
            for &n in &neg {
                let lits = self.base.ca().get_ref(n).lits().to_vec();
                self.extension.push_clause(lits, !pos_lit);
            }
            self.extension.push_unit(pos_lit);
        } else {
            for &p in &pos {
                let lits = self.base.ca().get_ref(p).lits().to_vec();
                self.extension.push_clause(lits, pos_lit);
            }
            self.extension.push_unit(!pos_lit);
        }

        // produce all resolvents, then drop the originals
        for &p in &pos {
            for &n in &neg {
                if merge(self.base.ca(), p, n, v, &mut resolvent) {
                    if !self.add_resolvent(&mut resolvent) {
                        return false;
                    }
                }
            }
        }
        for &cr in &cls {
            self.remove_clause_simp(cr);
        }
        self.occurs[v].clear();

        self.eliminated.insert_default(v, true);
        self.base.set_decision_var(v, false);
        self.eliminated_vars += 1;

        self.base.propagate_toplevel()
    }

    /// Insert a resolvent produced by variable elimination and index it
    /// for the rest of the pass. Returns `false` on unsatisfiability.
    fn add_resolvent(&mut self, resolvent: &mut Vec<Lit>) -> bool {
        match self.base.add_clause_internal(resolvent) {
            AddedClause::Unsat => false,
            AddedClause::Absorbed | AddedClause::Unit(_) => true,
            AddedClause::Attached(cr) => {
                let lits: Vec<Lit> = self.base.ca().get_ref(cr).lits().to_vec();
                for l in lits {
                    self.n_occ[l] += 1;
                    self.occurs[l.var()].push(cr);
                }
                self.subsumption_queue.push(cr);
                true
            }
        }
    }
}

// public API
impl<Cb: Callbacks> SolverInterface for SimpSolver<Cb> {
    fn new_var(&mut self, upol: lbool, dvar: bool) -> Var {
        let v = self.base.new_var(upol, dvar);
        self.frozen.insert_default(v, false);
        self.eliminated.insert_default(v, false);
        v
    }

    fn new_var_default(&mut self) -> Var {
        self.new_var(lbool::UNDEF, true)
    }

    fn var_of_int(&mut self, v_idx: u32) -> Var {
        while v_idx >= self.base.num_vars() {
            self.new_var_default();
        }
        Var::unsafe_from_idx(v_idx)
    }

    fn add_clause_reuse(&mut self, clause: &mut Vec<Lit>) -> bool {
        for &l in clause.iter() {
            assert!(
                !self.is_eliminated(l.var()),
                "adding a clause over the eliminated variable {:?} (freeze it before simplify)",
                l.var()
            );
        }
        self.base.add_clause_reuse(clause)
    }

    fn simplify_db(&mut self) -> bool {
        self.base.simplify_db()
    }

    fn solve_limited(&mut self, assumps: &[Lit]) -> lbool {
        for &l in assumps {
            assert!(
                !self.is_eliminated(l.var()),
                "assuming the eliminated variable {:?} (freeze it before simplify)",
                l.var()
            );
        }
        let res = self.base.solve_limited(assumps);
        if res == lbool::TRUE {
            // make the model cover the eliminated variables too
            let mut model = mem::take(self.base.model_mut());
            self.extension.extend_model(&mut model);
            *self.base.model_mut() = model;
        }
        res
    }

    fn is_ok(&self) -> bool {
        self.base.is_ok()
    }
    fn num_vars(&self) -> u32 {
        self.base.num_vars()
    }
    fn num_clauses(&self) -> u64 {
        self.base.num_clauses()
    }
    fn num_conflicts(&self) -> u64 {
        self.base.num_conflicts()
    }
    fn num_propagations(&self) -> u64 {
        self.base.num_propagations()
    }
    fn num_decisions(&self) -> u64 {
        self.base.num_decisions()
    }
    fn num_restarts(&self) -> u64 {
        self.base.num_restarts()
    }
    fn print_stats(&self) {
        self.base.print_stats();
        println!("c eliminated vars       : {}", self.eliminated_vars);
        println!("c subsumed clauses      : {}", self.subsumed_clauses);
        println!("c strengthened clauses  : {}", self.strengthened_clauses);
    }
    fn proved_at_lvl_0(&self) -> &[Lit] {
        self.base.proved_at_lvl_0()
    }
    fn get_model(&self) -> &[lbool] {
        self.base.get_model()
    }
    fn value_var(&self, v: Var) -> lbool {
        self.base.value_var(v)
    }
    fn value_lit(&self, lit: Lit) -> lbool {
        self.base.value_lit(lit)
    }
    fn value_lvl_0(&self, lit: Lit) -> lbool {
        self.base.value_lvl_0(lit)
    }
    fn unsat_core(&self) -> &[Lit] {
        self.base.unsat_core()
    }
    fn unsat_core_contains_lit(&self, lit: Lit) -> bool {
        self.base.unsat_core_contains_lit(lit)
    }
    fn unsat_core_contains_var(&self, v: Var) -> bool {
        self.base.unsat_core_contains_var(v)
    }
}

impl<Cb: Callbacks> fmt::Debug for SimpSolver<Cb> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SimpSolver")
            .field("n_vars", &self.base.num_vars())
            .field("n_clauses", &self.base.num_clauses())
            .field("n_eliminated", &self.eliminated_vars)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::callbacks::Basic;

    fn mk_solver() -> SimpSolver<Basic> {
        SimpSolver::default()
    }

    fn mk_solver_no_elim() -> SimpSolver<Basic> {
        SimpSolver::new(
            SolverOpts::default(),
            SimpOpts {
                use_elim: false,
                ..SimpOpts::default()
            },
            Basic::default(),
        )
    }

    fn live_clauses(s: &SimpSolver<Basic>) -> Vec<Vec<i32>> {
        s.clauses_iter()
            .map(|c| c.iter().map(|l| l.as_int()).collect())
            .collect()
    }

    #[test]
    fn test_subsumption_removes_duplicates() {
        let mut s = mk_solver_no_elim();
        s.add_clause(&[1, 2, 3]);
        s.add_clause(&[1, 2, 3]);
        s.add_clause(&[1, 2]);
        assert!(s.simplify(2));
        // [1,2] subsumes both copies of [1,2,3], and the second [1,2,3]
        // was identical to the first
        assert_eq!(live_clauses(&s), vec![vec![1, 2]]);
    }

    #[test]
    fn test_self_subsuming_strengthening() {
        let mut s = mk_solver_no_elim();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 2, 3]);
        assert!(s.simplify(2));
        let cs = live_clauses(&s);
        // resolving on 1 strengthens [-1,2,3] into [2,3]
        assert!(cs.contains(&vec![1, 2]));
        assert!(cs.contains(&vec![2, 3]));
        assert_eq!(cs.len(), 2);
    }

    #[test]
    fn test_elimination_records_witnesses() {
        let mut s = mk_solver();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        assert!(s.simplify(SimpSolver::<Basic>::DEFAULT_ROUNDS));
        assert!(s.num_eliminated_vars() > 0);
        assert!(s.num_witnesses() > 0);
        // still satisfiable, and the extended model satisfies the
        // original clauses
        assert_eq!(s.solve(), lbool::TRUE);
        let sat = |lit: i32| s.value_of_int(lit) == lbool::TRUE;
        assert!(sat(1) || sat(2));
        assert!(sat(-1) || sat(3));
    }

    #[test]
    fn test_simplify_preserves_unsat() {
        let mut s = mk_solver();
        s.add_clauses(vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
        // subsumption strengthens these into units and derives unsat
        // either here or in the subsequent solve
        let ok = s.simplify(3);
        if ok {
            assert_eq!(s.solve(), lbool::FALSE);
        } else {
            assert!(!s.is_ok());
        }
    }

    #[test]
    fn test_simplify_preserves_sat() {
        let mut s = mk_solver();
        s.add_clauses(vec![vec![1, 2], vec![-1, 2], vec![1, -2]]);
        assert!(s.simplify(3));
        assert_eq!(s.solve(), lbool::TRUE);
        assert_eq!(s.value_of_int(1), lbool::TRUE);
        assert_eq!(s.value_of_int(2), lbool::TRUE);
    }

    #[test]
    fn test_witness_traversal_backward_is_reversed() {
        let mut s = mk_solver();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        assert!(s.simplify(3));
        let fwd: Vec<_> = s.witnesses_forward().cloned().collect();
        let mut bwd: Vec<_> = s.witnesses_backward().cloned().collect();
        bwd.reverse();
        assert_eq!(fwd, bwd);
        assert!(fwd.len() > 0);
    }

    #[test]
    fn test_witness_visitor_early_stop() {
        let mut s = mk_solver();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        assert!(s.simplify(3));
        assert!(s.num_witnesses() > 1);
        let mut n = 0;
        let complete = s.traverse_witnesses_backward(&mut |_c, _w| {
            n += 1;
            false
        });
        assert!(!complete);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_frozen_variable_is_not_eliminated() {
        let mut s = mk_solver();
        let v = s.lit_of_int(1).var();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        s.freeze(v);
        assert!(s.simplify(3));
        assert!(!s.is_eliminated(v));
        // frozen vars may be assumed after simplification
        let a = Lit::new(v, true);
        assert_eq!(s.solve_limited(&[a]), lbool::TRUE);
        assert_eq!(s.value_of_int(1), lbool::TRUE);
    }

    #[test]
    #[should_panic(expected = "eliminated variable")]
    fn test_adding_over_eliminated_var_is_an_error() {
        let mut s = mk_solver();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        assert!(s.simplify(3));
        assert!(s.is_eliminated(Var::unsafe_from_idx(1)));
        // variable 2 was eliminated above
        s.add_clause(&[2, 4]);
    }

    #[test]
    fn test_extend_model_pure_replay() {
        let mut s = mk_solver();
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        assert!(s.simplify(3));
        assert_eq!(s.solve(), lbool::TRUE);
        // replaying by hand over a copy of the simplified model gives
        // the same extension the solver applied
        let mut model: Vec<lbool> = vec![lbool::UNDEF; s.num_vars() as usize];
        for c in s.clauses_iter() {
            // trivially satisfy the (possibly empty) simplified formula
            if let Some(&l) = c.first() {
                model[l.var().idx() as usize] = lbool::new(l.sign());
            }
        }
        s.extend_model(&mut model);
        let value = |lit: i32| {
            let v = model[(lit.abs() - 1) as usize];
            v ^ (lit < 0)
        };
        assert!(value(1) == lbool::TRUE || value(2) == lbool::TRUE);
        assert!(value(-1) == lbool::TRUE || value(3) == lbool::TRUE);
    }

    #[test]
    fn test_simplify_is_idempotent_at_fixpoint() {
        let mut s = mk_solver();
        s.add_clauses(vec![vec![1, 2, 3], vec![-1, 2], vec![3, 4], vec![-4, 1]]);
        assert!(s.simplify(3));
        let eliminated = s.num_eliminated_vars();
        let witnesses = s.num_witnesses();
        let clauses = live_clauses(&s);
        assert!(s.simplify(3));
        assert_eq!(s.num_eliminated_vars(), eliminated);
        assert_eq!(s.num_witnesses(), witnesses);
        assert_eq!(live_clauses(&s), clauses);
    }

    #[test]
    fn test_incremental_solve_and_simplify_interleaved() {
        let mut s = mk_solver();
        let a = s.lit_of_int(1).var();
        let b = s.lit_of_int(2).var();
        s.freeze(a);
        s.freeze(b);
        s.add_clause(&[1, 2]);
        s.add_clause(&[-1, 3]);
        assert!(s.simplify(3));
        assert_eq!(s.solve(), lbool::TRUE);
        s.add_clause(&[-2]);
        assert_eq!(s.solve(), lbool::TRUE);
        assert_eq!(s.value_of_int(1), lbool::TRUE);
        assert!(s.simplify(3));
        s.add_clause(&[-1]);
        assert_eq!(s.solve(), lbool::FALSE);
    }
}
