//! Reading several members in one pass, and iterating members.
use alloc::{borrow::Cow, collections::BTreeMap, vec, vec::Vec};

use crate::{Error, Value, ValueType, options::DEFAULT_MAX_DEPTH, scanner::Children};

/// An object member request for [`Value::get_many`] and [`Value::set_many`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyVal<'k, 'v> {
    pub key: &'k str,
    pub value: Value<'v>,
}

impl<'k, 'v> KeyVal<'k, 'v> {
    #[must_use]
    pub fn new(key: &'k str, value: Value<'v>) -> Self {
        Self { key, value }
    }
}

/// An array element request for [`Value::index_many`] and
/// [`Value::set_many_by_index`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexVal<'v> {
    pub index: usize,
    pub value: Value<'v>,
}

impl<'v> IndexVal<'v> {
    #[must_use]
    pub fn new(index: usize, value: Value<'v>) -> Self {
        Self { index, value }
    }
}

impl<'a> Value<'a> {
    fn children(&self, want: ValueType) -> Result<(&str, Children<'_>), Error> {
        let (raw, open) = self.container(want)?;
        let children =
            Children::new(raw, open, 0, DEFAULT_MAX_DEPTH).map_err(|e| e.into_error(raw))?;
        Ok((raw, children))
    }

    /// Looks up every `pairs[i].key` with one scan of the object, storing the
    /// results in `pairs[i].value`. Keys that are absent get
    /// [`ValueType::None`].
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an object,
    /// [`Error::Syntax`] for malformed members.
    ///
    /// ```rust
    /// use jsonsplice::{KeyVal, Value};
    ///
    /// let doc = Value::new(r#"{"a":1,"b":[2],"c":"3"}"#);
    /// let mut wanted = [KeyVal::new("c", Value::default()), KeyVal::new("x", Value::default())];
    /// doc.get_many(&mut wanted).unwrap();
    /// assert_eq!(wanted[0].value.as_str().unwrap(), "3");
    /// assert!(!wanted[1].value.exists());
    /// ```
    pub fn get_many(&self, pairs: &mut [KeyVal<'_, 'a>]) -> Result<(), Error> {
        for kv in pairs.iter_mut() {
            kv.value = Value::default();
        }
        let (raw, mut children) = self.children(ValueType::Object)?;
        let mut filled = vec![false; pairs.len()];
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            let Some(key) = child.key else { continue };
            let key = key.text(raw).map_err(|e| e.into_error(raw))?;
            for (kv, done) in pairs.iter_mut().zip(filled.iter_mut()) {
                if !*done && kv.key == key {
                    kv.value = self.child(child.value);
                    *done = true;
                }
            }
        }
        Ok(())
    }

    /// Looks up every `elems[i].index` with one scan of the array; see
    /// [`get_many`](Self::get_many).
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an array,
    /// [`Error::Syntax`] for malformed elements.
    pub fn index_many(&self, elems: &mut [IndexVal<'a>]) -> Result<(), Error> {
        for iv in elems.iter_mut() {
            iv.value = Value::default();
        }
        let (raw, mut children) = self.children(ValueType::Array)?;
        let mut index = 0;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            for iv in elems.iter_mut().filter(|iv| iv.index == index) {
                iv.value = self.child(child.value);
            }
            index += 1;
        }
        Ok(())
    }

    /// Calls `visit` with each member of an object in document order until it
    /// returns `false`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an object,
    /// [`Error::Syntax`] for malformed members.
    pub fn for_each_kv<'s, F>(&'s self, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(Cow<'s, str>, Value<'a>) -> bool,
    {
        let (raw, mut children) = self.children(ValueType::Object)?;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            let Some(key) = child.key else { continue };
            let key = key.text(raw).map_err(|e| e.into_error(raw))?;
            if !visit(key, self.child(child.value)) {
                break;
            }
        }
        Ok(())
    }

    /// Calls `visit` with each element of an array in order until it returns
    /// `false`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] unless the value is an array,
    /// [`Error::Syntax`] for malformed elements.
    pub fn for_each_elem<F>(&self, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(usize, Value<'a>) -> bool,
    {
        let (raw, mut children) = self.children(ValueType::Array)?;
        let mut index = 0;
        while let Some(child) = children.next_child().map_err(|e| e.into_error(raw))? {
            if !visit(index, self.child(child.value)) {
                break;
            }
            index += 1;
        }
        Ok(())
    }

    /// The elements of an array.
    ///
    /// # Errors
    ///
    /// As [`for_each_elem`](Self::for_each_elem).
    pub fn to_vec(&self) -> Result<Vec<Value<'a>>, Error> {
        let mut out = Vec::new();
        self.for_each_elem(|_, v| {
            out.push(v);
            true
        })?;
        Ok(out)
    }

    /// The members of an object by decoded key; a repeated key keeps its last
    /// value.
    ///
    /// # Errors
    ///
    /// As [`for_each_kv`](Self::for_each_kv).
    pub fn to_map(&self) -> Result<BTreeMap<Cow<'_, str>, Value<'a>>, Error> {
        let mut out = BTreeMap::new();
        self.for_each_kv(|k, v| {
            out.insert(k, v);
            true
        })?;
        Ok(out)
    }
}
