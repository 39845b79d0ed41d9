//! Resource guides - Built-in educational articles and the viewer state that shows them.

use crate::{
    entities::ResourceGuide,
    errors::{Error, Result},
};

/// Fixed set of guides, in display order.
#[derive(Debug, Clone)]
pub struct GuideLibrary {
    guides: Vec<ResourceGuide>,
}

impl GuideLibrary {
    /// The built-in guides.
    #[must_use]
    pub fn seeded() -> Self {
        let guides = [
            (
                "g1",
                "Transitioning to Organic",
                "A step-by-step guide on certification and soil management.",
                "Transitioning to organic farming requires a 36-month transition period where no prohibited substances are applied to the land. Key steps include: 1. Developing an Organic System Plan (OSP). 2. Focusing on soil health through cover cropping and composting. 3. Managing pests through integrated pest management (IPM) rather than synthetic chemicals.",
            ),
            (
                "g2",
                "Understanding REI & PHI",
                "Safety intervals you need to know for worker protection.",
                "REI (Restricted Entry Interval) is the time immediately after pesticide application when entry into the treated area is restricted. PHI (Pre-Harvest Interval) is the minimum amount of time that must pass between the last application of a pesticide and the harvesting of the crop. Always read the label!",
            ),
            (
                "g3",
                "Integrated Pest Management",
                "Strategies to reduce reliance on chemical controls.",
                "IPM is an ecosystem-based strategy that focuses on long-term prevention of pests or their damage through a combination of techniques such as biological control, habitat manipulation, modification of cultural practices, and use of resistant varieties.",
            ),
        ]
        .into_iter()
        .map(|(id, title, summary, content)| ResourceGuide {
            id: id.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            content: content.to_string(),
        })
        .collect();

        Self { guides }
    }

    /// Looks up a guide by id.
    ///
    /// # Errors
    /// Returns [`Error::GuideNotFound`] for unknown ids.
    pub fn get(&self, id: &str) -> Result<&ResourceGuide> {
        let wanted = id.trim();
        self.guides
            .iter()
            .find(|g| g.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::GuideNotFound { id: id.to_string() })
    }

    /// All guides in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResourceGuide> {
        self.guides.iter()
    }
}

/// Open/close state of the guide viewer.
///
/// Opening a guide while another is shown stacks the earlier one; closing pops
/// back to whatever was shown before.
#[derive(Debug, Default, Clone)]
pub struct GuideViewer {
    current: Option<String>,
    previous: Vec<String>,
}

impl GuideViewer {
    /// Opens the guide with the given id.
    ///
    /// # Errors
    /// Returns [`Error::GuideNotFound`] and leaves the viewer unchanged if the
    /// id is unknown.
    pub fn open<'a>(&mut self, library: &'a GuideLibrary, id: &str) -> Result<&'a ResourceGuide> {
        let guide = library.get(id)?;
        if let Some(shown) = self.current.replace(guide.id.clone()) {
            self.previous.push(shown);
        }
        Ok(guide)
    }

    /// Closes the current guide and returns the id now shown again, if any.
    pub fn close(&mut self) -> Option<&str> {
        self.current = self.previous.pop();
        self.current.as_deref()
    }

    /// Id of the guide currently shown.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_seeded_guides() {
        let library = GuideLibrary::seeded();
        let titles: Vec<&str> = library.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Transitioning to Organic",
                "Understanding REI & PHI",
                "Integrated Pest Management"
            ]
        );
        assert!(library.get("g2").unwrap().content.contains("Pre-Harvest Interval"));
        assert!(library.get("G3").is_ok());
    }

    #[test]
    fn test_unknown_guide() {
        let library = GuideLibrary::seeded();
        assert!(matches!(library.get("g9"), Err(Error::GuideNotFound { .. })));
    }

    #[test]
    fn test_viewer_restores_previous_guide_on_close() {
        let library = GuideLibrary::seeded();
        let mut viewer = GuideViewer::default();
        assert!(viewer.current().is_none());

        viewer.open(&library, "g1").unwrap();
        viewer.open(&library, "g3").unwrap();
        assert_eq!(viewer.current(), Some("g3"));

        assert_eq!(viewer.close(), Some("g1"));
        assert_eq!(viewer.close(), None);
        assert_eq!(viewer.close(), None);
    }

    #[test]
    fn test_viewer_ignores_unknown_id() {
        let library = GuideLibrary::seeded();
        let mut viewer = GuideViewer::default();
        viewer.open(&library, "g2").unwrap();
        assert!(viewer.open(&library, "nope").is_err());
        assert_eq!(viewer.current(), Some("g2"));
    }
}
