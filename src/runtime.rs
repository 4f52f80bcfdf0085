//! Runtime support for generated pattern factories.
//!
//! A generated `FooPatterns::some(p1)` returns a [`Pattern1`] that runs the
//! `#[unapply]` extractor on a value and, when it yields components, matches
//! each component against its sub-pattern. Leaf patterns are [`any`],
//! [`bind`] and [`eq`].
//!
//! ```rust
//! use patgen::runtime::{bind, eq, Pattern, Pattern2};
//!
//! fn unapply_pair(value: &(i32, &'static str)) -> Option<(i32, &'static str)> {
//!     Some(*value)
//! }
//!
//! let pattern = Pattern2::new(unapply_pair, eq(1), bind());
//! assert_eq!(pattern.apply(&(1, "one")), Some(((), "one")));
//! assert_eq!(pattern.apply(&(2, "two")), None);
//! ```

/// Widest tuple an extractor can hand to a generated factory.
pub const MAX_ARITY: usize = 8;

/// A matchable pattern over values of type `T`.
pub trait Pattern<T: ?Sized> {
    /// Values bound by a successful match
    type Output;

    /// Match `value`, returning the bound values or `None` on mismatch.
    fn apply(&self, value: &T) -> Option<Self::Output>;

    fn matches(&self, value: &T) -> bool {
        self.apply(value).is_some()
    }
}

/// Matches anything and binds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl<T: ?Sized> Pattern<T> for Any {
    type Output = ();

    fn apply(&self, _value: &T) -> Option<()> {
        Some(())
    }
}

pub fn any() -> Any {
    Any
}

/// Matches anything and binds a clone of the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bind;

impl<T: Clone> Pattern<T> for Bind {
    type Output = T;

    fn apply(&self, value: &T) -> Option<T> {
        Some(value.clone())
    }
}

pub fn bind() -> Bind {
    Bind
}

/// Matches values equal to the expected one.
#[derive(Debug, Clone, Copy)]
pub struct Equals<V>(V);

impl<T, V> Pattern<T> for Equals<V>
where
    T: PartialEq<V> + ?Sized,
{
    type Output = ();

    fn apply(&self, value: &T) -> Option<()> {
        (*value == self.0).then_some(())
    }
}

pub fn eq<V>(expected: V) -> Equals<V> {
    Equals(expected)
}

/// Pattern built from an extractor that yields no components.
pub struct Pattern0<T: ?Sized> {
    extract: fn(&T) -> Option<()>,
}

impl<T: ?Sized> Pattern0<T> {
    pub fn new(extract: fn(&T) -> Option<()>) -> Self {
        Self { extract }
    }
}

impl<T: ?Sized> Pattern<T> for Pattern0<T> {
    type Output = ();

    fn apply(&self, value: &T) -> Option<()> {
        (self.extract)(value)
    }
}

macro_rules! pattern_n {
    ($(#[$doc:meta])* $name:ident; $($c:ident $p:ident $f:ident $i:tt),+) => {
        $(#[$doc])*
        pub struct $name<T: ?Sized, $($c,)+ $($p,)+> {
            extract: fn(&T) -> Option<($($c,)+)>,
            $($f: $p,)+
        }

        impl<T: ?Sized, $($c,)+ $($p,)+> $name<T, $($c,)+ $($p,)+> {
            pub fn new(extract: fn(&T) -> Option<($($c,)+)>, $($f: $p),+) -> Self {
                Self { extract, $($f),+ }
            }
        }

        impl<T: ?Sized, $($c,)+ $($p,)+> Pattern<T> for $name<T, $($c,)+ $($p,)+>
        where
            $($p: Pattern<$c>,)+
        {
            type Output = ($(<$p as Pattern<$c>>::Output,)+);

            fn apply(&self, value: &T) -> Option<Self::Output> {
                let components = (self.extract)(value)?;
                Some(($(self.$f.apply(&components.$i)?,)+))
            }
        }
    };
}

pattern_n!(
    /// Pattern built from a one-component extractor.
    Pattern1; A1 P1 p1 0
);
pattern_n!(
    /// Pattern built from a two-component extractor.
    Pattern2; A1 P1 p1 0, A2 P2 p2 1
);
pattern_n!(Pattern3; A1 P1 p1 0, A2 P2 p2 1, A3 P3 p3 2);
pattern_n!(Pattern4; A1 P1 p1 0, A2 P2 p2 1, A3 P3 p3 2, A4 P4 p4 3);
pattern_n!(Pattern5; A1 P1 p1 0, A2 P2 p2 1, A3 P3 p3 2, A4 P4 p4 3, A5 P5 p5 4);
pattern_n!(Pattern6; A1 P1 p1 0, A2 P2 p2 1, A3 P3 p3 2, A4 P4 p4 3, A5 P5 p5 4, A6 P6 p6 5);
pattern_n!(
    Pattern7; A1 P1 p1 0, A2 P2 p2 1, A3 P3 p3 2, A4 P4 p4 3, A5 P5 p5 4, A6 P6 p6 5,
    A7 P7 p7 6
);
pattern_n!(
    Pattern8; A1 P1 p1 0, A2 P2 p2 1, A3 P3 p3 2, A4 P4 p4 3, A5 P5 p5 4, A6 P6 p6 5,
    A7 P7 p7 6, A8 P8 p8 7
);
