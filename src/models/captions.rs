//! Per-section caption text shown alongside the camera path.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionCaption {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
}

/// Caption for `section`, clamped to the last entry.
pub fn caption_for(section: usize) -> &'static SectionCaption {
    &SECTION_CAPTIONS[section.min(SECTION_CAPTIONS.len() - 1)]
}

pub fn captions() -> &'static [SectionCaption] {
    &SECTION_CAPTIONS
}

const SECTION_CAPTIONS: [SectionCaption; 13] = [
    SectionCaption {
        title: "Wacced Out Murals",
        subtitle: "Cultural Defense & Legacy",
        description: "The journey begins where defaced murals symbolize contested cultural memory. Like the GNX, Kendrick's vehicle becomes a mobile archive protecting Black artistic expression from erasure.",
    },
    SectionCaption {
        title: "Squabble Up",
        subtitle: "Mobilizing for Cultural Battle",
        description: "An aggressive stance preparing for confrontation. The track's military imagery transforms the GNX from status symbol to tactical vehicle for cultural defense and authentic expression.",
    },
    SectionCaption {
        title: "Luther",
        subtitle: "Precision & Tenderness",
        description: "The clean profile reveals how technical excellence serves emotional expression. Like Luther Vandross's vocal mastery, the GNX demonstrates how controlled power enables movement across different cultural territories.",
    },
    SectionCaption {
        title: "Man at the Garden",
        subtitle: "Achievement & Deserved Success",
        description: "A meditation on what success truly means. The powerful stance of the GNX represents not just material achievement but personal growth and cultural impact that transcends individual gain.",
    },
    SectionCaption {
        title: "Hey Now",
        subtitle: "Navigating Multiple Spaces",
        description: "The reflective surface captures movement through physical, social, and cultural territories. Like the GNX's ability to traverse different environments, the track explores mobility across boundaries.",
    },
    SectionCaption {
        title: "Reincarnated",
        subtitle: "Spiritual Transformation",
        description: "Viewed from above, we witness transformation and rebirth. The GNX becomes a vehicle for spiritual recursion, suggesting Kendrick as a soul reincarnated to address music's complex relationship with Black culture.",
    },
    SectionCaption {
        title: "TV Off",
        subtitle: "Technical Precision & Raw Power",
        description: "Examining the mechanics of power through technical excellence. The track's exploration of military structure parallels the GNX's combination of engineering precision and raw force.",
    },
    SectionCaption {
        title: "Dodger Blue",
        subtitle: "Territorial Authority",
        description: "Authentic movement through LA's geography and culture. The GNX framework here demonstrates how mastery of territory through authentic connection establishes cultural authority.",
    },
    SectionCaption {
        title: "Peekaboo",
        subtitle: "Strategic Visibility",
        description: "Playful yet powerful, this angle explores surveillance as power. The track transforms the GNX's stealth capabilities into a meditation on controlling one's visibility in both physical and digital spaces.",
    },
    SectionCaption {
        title: "Heart Pt. 6",
        subtitle: "Memory as Vehicle",
        description: "From this perspective, we see how memory becomes a vehicle for temporal navigation. The GNX framework illuminates movement through time, artistic development, and cultural preservation.",
    },
    SectionCaption {
        title: "GNX",
        subtitle: "The Ultimate Framework",
        description: "The title track reveals the full meaning of the Grand National Experimental - a sophisticated framework for understanding movement, power, and authentic expression in contemporary culture.",
    },
    SectionCaption {
        title: "Gloria",
        subtitle: "Love Letter to Hip-Hop",
        description: "Glory from this angle reveals the intimate relationship between artist and art. Using the metaphor of romance, the track explores Kendrick's complex bond with hip-hop as both companion and conveyance.",
    },
    SectionCaption {
        title: "Loop Complete",
        subtitle: "Cultural Transcendence",
        description: "Our journey comes full circle, revealing the GNX as performance space, battle station, and escape route - just as hip-hop functions as entertainment, cultural weapon, and path to transcendence.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::viewpoint::ViewpointTable;

    #[test]
    fn one_caption_per_viewpoint() {
        assert_eq!(captions().len(), ViewpointTable::gnx_showcase().len());
    }

    #[test]
    fn out_of_range_section_uses_last_caption() {
        assert_eq!(caption_for(40).title, "Loop Complete");
        assert_eq!(caption_for(0).title, "Wacced Out Murals");
    }
}
