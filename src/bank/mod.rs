//! Template libraries.
//!
//! A library is an append-only collection of descriptors that all share one
//! length, so any sample of that length can be compared against every entry.
//! The detector keeps two: the caller's known-templates library (shared
//! behind an `RwLock`) and a per-pass samples library it builds itself.

use crate::contour::Contour;
use crate::template::Template;
use crate::util::{DetectError, DetectResult};

/// Append-only set of equal-length descriptors.
#[derive(Clone, Debug)]
pub struct TemplateLibrary {
    template_size: usize,
    templates: Vec<Template>,
}

impl TemplateLibrary {
    /// Creates an empty library for descriptors of `template_size` vectors.
    pub fn new(template_size: usize) -> DetectResult<Self> {
        if template_size < 2 {
            return Err(DetectError::InvalidInput("template_size must be >= 2"));
        }
        Ok(Self {
            template_size,
            templates: Vec::new(),
        })
    }

    /// Descriptor length shared by every entry.
    pub fn template_size(&self) -> usize {
        self.template_size
    }

    /// Appends a descriptor; rejects one of a different length.
    pub fn push(&mut self, template: Template) -> DetectResult<()> {
        if template.len() != self.template_size {
            return Err(DetectError::DescriptorLengthMismatch {
                expected: self.template_size,
                got: template.len(),
            });
        }
        self.templates.push(template);
        Ok(())
    }

    /// Encodes `contour` as a named entry and returns its index.
    pub fn add_contour(&mut self, name: impl Into<String>, contour: &Contour) -> DetectResult<usize> {
        let index = self.templates.len();
        let template = Template::from_contour(contour, index, self.template_size)?.with_name(name);
        self.push(template)?;
        Ok(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when the library has no entries.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    /// Returns all entries in insertion order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub(crate) fn sort_by_contour_index(&mut self) {
        self.templates.sort_by_key(Template::contour_index);
    }
}

impl<'a> IntoIterator for &'a TemplateLibrary {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}
