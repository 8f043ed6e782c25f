//! Labels: named, ordered, duplicate-free sets of integer tuples
//!
//! Labels are the metadata index of every axis in a [`TensorBlock`] and of the
//! keys of a [`TensorMap`]. They are built from two layers:
//!
//! - [`LabelRows`]: an ordered sequence of named integer tuples where
//!   duplicates are allowed. This is what you get when projecting labels onto a
//!   subset of their columns, and the input to [`LabelRows::unique`].
//! - [`Labels`]: a [`LabelRows`] with the additional guarantee that every entry
//!   is unique, together with a hash index for O(1) entry lookup.
//!
//! Entry order is meaningful (it defines the order of the corresponding array
//! axis) and is never changed implicitly; set operations produce fresh
//! instances.
//!
//! # Examples
//!
//! ```
//! use tenmap_core::Labels;
//!
//! let samples = Labels::new(
//!     &["system", "atom"],
//!     vec![vec![0, 0], vec![0, 1], vec![1, 0]],
//! ).unwrap();
//!
//! assert_eq!(samples.len(), 3);
//! assert_eq!(samples.position(&[0, 1]), Some(1));
//!
//! // projection keeps duplicates, `unique` removes them and sorts
//! let systems = samples.select(&["system"]).unwrap();
//! assert_eq!(systems.len(), 3);
//! assert_eq!(systems.unique(), Labels::new(&["system"], vec![vec![0], vec![1]]).unwrap());
//! ```
//!
//! [`TensorBlock`]: crate::TensorBlock
//! [`TensorMap`]: crate::TensorMap

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use smallvec::SmallVec;

use crate::error::{Result, TensorMapError};

/// Convert an index or count to a [`LabelValue`]
///
/// Fails with [`TensorMapError::InvalidLabels`] when `value` is larger than
/// `LabelValue::MAX`.
pub fn label_value(value: usize) -> Result<LabelValue> {
    LabelValue::try_from(value).map_err(|_| {
        TensorMapError::InvalidLabels(format!(
            "{value} does not fit in a label value (maximum is {})",
            LabelValue::MAX
        ))
    })
}

/// Integer value stored in labels
pub type LabelValue = i32;

type EntryKey = SmallVec<[LabelValue; 4]>;

/// Maximal number of entries printed by the `Display` implementation
const DISPLAY_MAX_ROWS: usize = 20;

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    if names.is_empty() {
        return Err(TensorMapError::invalid_labels(
            "labels must have at least one name",
        ));
    }

    let mut validated: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if !is_valid_identifier(name) {
            return Err(TensorMapError::invalid_labels(format!(
                "'{name}' is not a valid label name"
            )));
        }
        if validated.iter().any(|n| n == name) {
            return Err(TensorMapError::invalid_labels(format!(
                "the name '{name}' is used more than once"
            )));
        }
        validated.push(name.to_string());
    }
    Ok(validated)
}

/// An ordered sequence of named integer tuples, duplicates allowed.
///
/// Values are stored flat, in row-major order. This type is the shared
/// storage and projection layer under [`Labels`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LabelRows {
    names: Vec<String>,
    values: Vec<LabelValue>,
}

impl LabelRows {
    /// Create rows from names and flat row-major values
    pub fn new<S: AsRef<str>>(names: &[S], values: Vec<LabelValue>) -> Result<Self> {
        let names = validate_names(names)?;
        if values.len() % names.len() != 0 {
            return Err(TensorMapError::invalid_labels(format!(
                "got {} values, which is not a multiple of the number of names ({})",
                values.len(),
                names.len()
            )));
        }
        Ok(Self { names, values })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns (arity of every row)
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len() / self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[LabelValue]> {
        let size = self.size();
        self.values.get(index * size..(index + 1) * size)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[LabelValue]> + '_ {
        self.values.chunks_exact(self.size())
    }

    /// Flat row-major values
    pub fn values(&self) -> &[LabelValue] {
        &self.values
    }

    fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.names
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| TensorMapError::unknown_column(name, &self.names))
            })
            .collect()
    }

    /// Project every row onto a subset of the columns, keeping row order and
    /// duplicates
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<LabelRows> {
        let columns = self.column_indices(names)?;
        let names = validate_names(names)?;

        let mut values = Vec::with_capacity(self.len() * columns.len());
        for row in self.iter() {
            values.extend(columns.iter().map(|&c| row[c]));
        }
        Ok(LabelRows { names, values })
    }

    /// Values of a single column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<LabelValue>> {
        let column = self.column_indices(&[name])?[0];
        Ok(self.iter().map(|row| row[column]).collect())
    }

    /// Every distinct row exactly once, sorted in ascending lexicographic
    /// order. Empty rows give empty labels with the same names.
    pub fn unique(&self) -> Labels {
        let mut rows = self.iter().collect::<Vec<_>>();
        rows.sort_unstable();
        rows.dedup();

        let values = rows.into_iter().flatten().copied().collect();
        Labels::from_unique_rows(LabelRows {
            names: self.names.clone(),
            values,
        })
    }

    fn with_values(&self, values: Vec<LabelValue>) -> LabelRows {
        LabelRows {
            names: self.names.clone(),
            values,
        }
    }
}

impl fmt::Debug for LabelRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelRows")
            .field("names", &self.names)
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Named, ordered, duplicate-free set of integer tuples.
///
/// Two labels are equal if they have the same names in the same order and the
/// same entries in the same order.
#[derive(Clone)]
pub struct Labels {
    rows: LabelRows,
    positions: HashMap<EntryKey, usize>,
}

impl Labels {
    /// Create labels from names and a list of entries
    ///
    /// # Errors
    ///
    /// Returns [`TensorMapError::InvalidLabels`] if names are duplicated or
    /// invalid, if an entry does not have one value per name, or if an entry
    /// appears more than once.
    pub fn new<S: AsRef<str>>(names: &[S], entries: Vec<Vec<LabelValue>>) -> Result<Self> {
        let size = names.len();
        let mut values = Vec::with_capacity(entries.len() * size);
        for (i, entry) in entries.iter().enumerate() {
            if entry.len() != size {
                return Err(TensorMapError::invalid_labels(format!(
                    "entry {i} has {} values, but there are {size} names",
                    entry.len()
                )));
            }
            values.extend_from_slice(entry);
        }
        Self::from_flat(names, values)
    }

    /// Create labels from names and flat row-major values
    pub fn from_flat<S: AsRef<str>>(names: &[S], values: Vec<LabelValue>) -> Result<Self> {
        Self::try_from(LabelRows::new(names, values)?)
    }

    /// Labels with the given names and no entries
    pub fn empty<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::from_flat(names, Vec::new())
    }

    /// The `("_", [[0]])` labels, used for tensors with a single block
    pub fn single() -> Self {
        Self::from_unique_rows(LabelRows {
            names: vec!["_".to_string()],
            values: vec![0],
        })
    }

    /// Labels with a single `name` column containing `0..n`
    ///
    /// Fails with [`TensorMapError::InvalidLabels`] if `n` does not fit in a
    /// [`LabelValue`].
    pub fn range(name: &str, n: usize) -> Result<Self> {
        let rows = LabelRows::new(&[name], (0..label_value(n)?).collect())?;
        Ok(Self::from_unique_rows(rows))
    }

    /// Build the lookup index over rows known to be unique
    fn from_unique_rows(rows: LabelRows) -> Self {
        let positions = rows
            .iter()
            .enumerate()
            .map(|(i, entry)| (EntryKey::from_slice(entry), i))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(positions.len(), rows.len());
        Self { rows, positions }
    }

    pub fn names(&self) -> &[String] {
        self.rows.names()
    }

    pub fn size(&self) -> usize {
        self.rows.size()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[LabelValue]> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[LabelValue]> + '_ {
        self.rows.iter()
    }

    pub fn values(&self) -> &[LabelValue] {
        self.rows.values()
    }

    pub fn as_rows(&self) -> &LabelRows {
        &self.rows
    }

    pub fn into_rows(self) -> LabelRows {
        self.rows
    }

    /// Position of `entry` in these labels
    pub fn position(&self, entry: &[LabelValue]) -> Option<usize> {
        self.positions.get(entry).copied()
    }

    pub fn contains(&self, entry: &[LabelValue]) -> bool {
        self.positions.contains_key(entry)
    }

    /// Project the entries onto a subset of the columns. The result keeps the
    /// entry order and may contain duplicates.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<LabelRows> {
        self.rows.select(names)
    }

    pub fn column(&self, name: &str) -> Result<Vec<LabelValue>> {
        self.rows.column(name)
    }

    /// Indices of all entries matching a partial key given as `(name, value)`
    /// pairs. An empty selection matches every entry; no match gives an empty
    /// vector.
    pub fn matching(&self, selection: &[(&str, LabelValue)]) -> Result<Vec<usize>> {
        let names = selection.iter().map(|(n, _)| *n).collect::<Vec<_>>();
        let columns = self.rows.column_indices(&names)?;

        Ok(self
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                columns
                    .iter()
                    .zip(selection)
                    .all(|(&c, &(_, value))| entry[c] == value)
            })
            .map(|(i, _)| i)
            .collect())
    }

    fn check_same_names(&self, other: &Labels, operation: &str) -> Result<()> {
        if self.names() != other.names() {
            return Err(TensorMapError::invalid_labels(format!(
                "can not take the {operation} of labels with different names: [{}] and [{}]",
                self.names().join(", "),
                other.names().join(", "),
            )));
        }
        Ok(())
    }

    /// Entries of `self` in their original order, followed by the entries only
    /// present in `other`, in their order in `other`
    pub fn union(&self, other: &Labels) -> Result<Labels> {
        self.check_same_names(other, "union")?;

        let mut values = self.values().to_vec();
        for entry in other.iter() {
            if !self.contains(entry) {
                values.extend_from_slice(entry);
            }
        }
        Ok(Self::from_unique_rows(self.rows.with_values(values)))
    }

    /// Entries present in both labels, in the order of `self`
    pub fn intersection(&self, other: &Labels) -> Result<Labels> {
        self.check_same_names(other, "intersection")?;

        let mut values = Vec::new();
        for entry in self.iter() {
            if other.contains(entry) {
                values.extend_from_slice(entry);
            }
        }
        Ok(Self::from_unique_rows(self.rows.with_values(values)))
    }

    /// A copy of these labels with entries sorted lexicographically
    pub fn sorted(&self) -> Labels {
        self.rows.unique()
    }
}

impl TryFrom<LabelRows> for Labels {
    type Error = TensorMapError;

    fn try_from(rows: LabelRows) -> Result<Self> {
        let mut positions = HashMap::with_capacity(rows.len());
        for (i, entry) in rows.iter().enumerate() {
            if let Some(first) = positions.insert(EntryKey::from_slice(entry), i) {
                return Err(TensorMapError::invalid_labels(format!(
                    "entry {entry:?} appears more than once (at positions {first} and {i})"
                )));
            }
        }
        Ok(Self { rows, positions })
    }
}

impl PartialEq for Labels {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for Labels {}

impl Hash for Labels {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
    }
}

impl Index<usize> for Labels {
    type Output = [LabelValue];

    fn index(&self, index: usize) -> &[LabelValue] {
        match self.get(index) {
            Some(entry) => entry,
            None => panic!(
                "index {index} is out of bounds for labels with {} entries",
                self.len()
            ),
        }
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a [LabelValue];
    type IntoIter = std::slice::ChunksExact<'a, LabelValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.values.chunks_exact(self.rows.size())
    }
}

impl fmt::Debug for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Labels")
            .field("names", &self.names())
            .field("values", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self
            .names()
            .iter()
            .enumerate()
            .map(|(c, name)| {
                self.iter()
                    .take(DISPLAY_MAX_ROWS)
                    .map(|entry| entry[c].to_string().len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        writeln!(f, "Labels(")?;
        write!(f, "   ")?;
        for (name, width) in self.names().iter().zip(&widths) {
            write!(f, " {name:>width$}")?;
        }
        writeln!(f)?;

        for entry in self.iter().take(DISPLAY_MAX_ROWS) {
            write!(f, "   ")?;
            for (value, width) in entry.iter().zip(&widths) {
                write!(f, " {value:>width$}")?;
            }
            writeln!(f)?;
        }
        if self.len() > DISPLAY_MAX_ROWS {
            writeln!(f, "    ... ({} entries in total)", self.len())?;
        }
        write!(f, ")")
    }
}
