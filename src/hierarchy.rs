//! Nested generic wrappers that report their own runtime type and address.
//!
//! `Level0` does the work, `Level1` borrows a `Level0`, `Level2Base` borrows a
//! `Level1`, and `Level2Derived` wraps a `Level2Base` and is called through
//! `&dyn Evaluate`. Every level can describe itself and the levels it borrows,
//! which shows that the borrowed addresses are exactly the inner values'
//! addresses: nothing is copied on the way down.
//!
//! `std::any::type_name` output is not stable across compiler versions, so
//! only its structure should be relied on.

use colored::Colorize;
use std::any;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub trait Evaluate {
    fn evaluate(&self, p: &Point) -> f64;
}

/// Gives access to the level one step down.
pub trait Nested {
    type Inner;

    fn inner(&self) -> &Self::Inner;
}

#[derive(Debug, Default)]
pub struct Level0;

impl Evaluate for Level0 {
    fn evaluate(&self, p: &Point) -> f64 {
        p.x * p.y
    }
}

#[derive(Debug)]
pub struct Level1<'a, L0> {
    pub l0: &'a L0,
}

impl<'a, L0> Level1<'a, L0> {
    pub fn new(l0: &'a L0) -> Self {
        Self { l0 }
    }

    pub fn describe(&self) -> Vec<LevelReport> {
        vec![LevelReport::of("Level1", self), LevelReport::of(">>> L0", self.l0)]
    }
}

impl<L0: Evaluate> Evaluate for Level1<'_, L0> {
    fn evaluate(&self, p: &Point) -> f64 {
        self.l0.evaluate(p)
    }
}

impl<L0> Nested for Level1<'_, L0> {
    type Inner = L0;

    fn inner(&self) -> &L0 {
        self.l0
    }
}

/// Holds the borrowed level; evaluation is left to the wrapper around it.
#[derive(Debug)]
pub struct Level2Base<'a, L1> {
    pub l1: &'a L1,
}

impl<'a, L1: Nested> Level2Base<'a, L1> {
    pub fn new(l1: &'a L1) -> Self {
        Self { l1 }
    }

    pub fn describe(&self) -> Vec<LevelReport> {
        vec![
            LevelReport::of("Level2Base", self),
            LevelReport::of(">>> L1", self.l1),
            LevelReport::of(">>> >>> L0", self.l1.inner()),
        ]
    }
}

#[derive(Debug)]
pub struct Level2Derived<'a, L1> {
    pub base: Level2Base<'a, L1>,
}

impl<'a, L1: Nested> Level2Derived<'a, L1> {
    pub fn new(l1: &'a L1) -> Self {
        Self {
            base: Level2Base::new(l1),
        }
    }

    pub fn describe(&self) -> Vec<LevelReport> {
        vec![
            LevelReport::of("Level2Derived", self),
            LevelReport::of(">>> L1", self.base.l1),
            LevelReport::of(">>> >>> L0", self.base.l1.inner()),
        ]
    }
}

impl<L1: Evaluate> Evaluate for Level2Derived<'_, L1> {
    fn evaluate(&self, p: &Point) -> f64 {
        self.base.l1.evaluate(p)
    }
}

// =============================================================================
// Reporting
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub label: &'static str,
    /// Simplified name of `*const T`, mirroring the pointer the level sees.
    pub type_name: String,
    pub address: usize,
}

impl LevelReport {
    pub fn of<T: ?Sized>(label: &'static str, value: &T) -> Self {
        Self {
            label,
            type_name: simplify_type_name(any::type_name::<*const T>()),
            address: value as *const T as *const () as usize,
        }
    }
}

/// `{}` prints `label\ttype\taddress`; `{:#}` prints the same with a
/// coloured label.
impl fmt::Display for LevelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.label.cyan())?;
        } else {
            f.write_str(self.label)?;
        }
        write!(f, "\t{}\t{:#x}", self.type_name, self.address)
    }
}

/// Drops module paths from every path segment and erases lifetimes, leaving
/// generic structure, references and pointers intact:
/// `alloc::vec::Vec<core::option::Option<u8>>` becomes `Vec<Option<u8>>` and
/// `a::Level1<'_, a::Level0>` becomes `Level1<Level0>`.
pub fn simplify_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            skip_lifetime(&mut chars);
        } else if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            push_last_segment(&mut out, &path);
            path.clear();
            if c == '>' {
                close_generics(&mut out);
            } else {
                out.push(c);
            }
        }
    }
    push_last_segment(&mut out, &path);

    out
}

/// Consumes the rest of a lifetime and the separator after it.
fn skip_lifetime(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_alphanumeric() || *c == '_').is_some() {}
    chars.next_if_eq(&',');
    while chars.next_if_eq(&' ').is_some() {}
}

fn close_generics(out: &mut String) {
    if out.ends_with(", ") {
        out.truncate(out.len() - 2);
    }
    // Generics that only held lifetimes disappear entirely.
    if out.ends_with('<') {
        out.pop();
    } else {
        out.push('>');
    }
}

fn push_last_segment(out: &mut String, path: &str) {
    out.push_str(path.rsplit("::").next().unwrap_or(path));
}

/// The report blocks for a fully built chain, outermost last, as the demo
/// prints them.
pub fn chain_reports<L0>(
    l1: &Level1<'_, L0>,
    l2: &Level2Derived<'_, Level1<'_, L0>>,
) -> Vec<Vec<LevelReport>> {
    vec![l1.describe(), l2.base.describe(), l2.describe()]
}
