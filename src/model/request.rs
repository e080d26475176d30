//! Incoming report payloads, as submitted by the field client.

use serde::Deserialize;

/// A report as submitted, before references are resolved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    #[serde(default)]
    pub researcher_username: String,
    pub beach_name: String,

    /// Client-side beach length. Never used as the stored total.
    #[serde(default)]
    pub total_beach_length: Option<f64>,

    #[serde(default)]
    pub expected_trash_amount: u32,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub special_note: String,
    #[serde(default)]
    pub research_sub_list: Vec<SegmentRequest>,
    #[serde(default)]
    pub uploaded_file_names: Vec<String>,
}

/// One surveyed stretch as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRequest {
    pub beach_name_with_index: String,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,

    /// Debris label, e.g. `FISHING_GEAR`. Parsed during assembly.
    pub main_trash_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_payload() {
        let json = r#"{
            "researcherUsername": "minji",
            "beachName": "Haeundae",
            "totalBeachLength": 1500.0,
            "expectedTrashAmount": 40,
            "weather": "clear",
            "researchSubList": [{
                "beachNameWithIndex": "Haeundae-1",
                "startLatitude": 35.1587,
                "startLongitude": 129.1604,
                "endLatitude": 35.1590,
                "endLongitude": 129.1640,
                "mainTrashType": "BUOY"
            }]
        }"#;

        let req: ResearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.researcher_username, "minji");
        assert_eq!(req.total_beach_length, Some(1500.0));
        assert_eq!(req.research_sub_list.len(), 1);
        assert_eq!(req.research_sub_list[0].main_trash_type, "BUOY");
        assert!(req.special_note.is_empty());
        assert!(req.uploaded_file_names.is_empty());
    }
}
