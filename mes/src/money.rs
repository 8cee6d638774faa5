// Copyright 2024 Andrew Conway.
// This file is part of ConcreteMES.
// ConcreteMES is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteMES is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteMES.  If not, see <https://www.gnu.org/licenses/>.

//! The arithmetic used for costs, budgets and effective vote counts.
//!
//! The published method is usually run with floating point numbers, which is fast but means that
//! two effective vote counts that are mathematically equal may compare as different. Exact
//! rational arithmetic avoids this at some cost in speed.

use std::fmt::{Debug, Display};
use num::{BigInt, BigRational, Num};

/// Something that can be used as an amount of money in the method of equal shares.
pub trait Money : Clone+PartialOrd+Num+Display+Debug {
    fn from_usize(n:usize) -> Self;
    /// false for NaN and infinities.
    fn is_finite(&self) -> bool;
    /// Round down to an integer.
    fn floor(&self) -> Self;
    fn is_negative(&self) -> bool { *self < Self::zero() }
    /// The smaller of two values, preferring self if equal.
    fn min_money(self,other:Self) -> Self { if other<self { other } else { self } }
}

impl Money for f64 {
    fn from_usize(n: usize) -> Self { n as f64 }
    fn is_finite(&self) -> bool { f64::is_finite(*self) }
    fn floor(&self) -> Self { f64::floor(*self) }
}

impl Money for BigRational {
    fn from_usize(n: usize) -> Self { BigRational::from_integer(BigInt::from(n)) }
    fn is_finite(&self) -> bool { true }
    fn floor(&self) -> Self { BigRational::floor(self) }
}

/// Sum a list of amounts, in order.
/// ```
/// use mes::money::sum_money;
/// assert_eq!(sum_money([1.5,2.0,3.0].iter()),6.5);
/// ```
pub fn sum_money<'a,M:Money+'a>(values:impl IntoIterator<Item=&'a M>) -> M {
    let mut res = M::zero();
    for v in values { res = res+v.clone(); }
    res
}

/// The exact value of the shortest decimal that prints as the given floating point number, e.g. 0.1 gives 1/10
/// rather than the slightly different number actually stored. None for NaN and infinities.
/// ```
/// use mes::money::rational_from_decimal;
/// use num::{BigInt, BigRational};
/// assert_eq!(rational_from_decimal(0.1),Some(BigRational::new(BigInt::from(1),BigInt::from(10))));
/// assert_eq!(rational_from_decimal(-2.5),Some(BigRational::new(BigInt::from(-5),BigInt::from(2))));
/// assert_eq!(rational_from_decimal(300.0),Some(BigRational::from_integer(BigInt::from(300))));
/// assert_eq!(rational_from_decimal(f64::NAN),None);
/// ```
pub fn rational_from_decimal(value:f64) -> Option<BigRational> {
    if !value.is_finite() { return None; }
    let text = value.to_string(); // Display for f64 never uses an exponent.
    let (whole,fraction) = text.split_once('.').unwrap_or((text.as_str(),""));
    let numerator : BigInt = format!("{}{}",whole,fraction).parse().ok()?;
    let denominator = num::pow(BigInt::from(10),fraction.len());
    Some(BigRational::new(numerator,denominator))
}
