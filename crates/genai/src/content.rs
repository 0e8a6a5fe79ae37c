//! Subtopic and description generation.

use crate::model::{GenerateRequest, GenerativeModel};
use deckgen_core::{Error, Result, Subtopic, SubtopicParser, Topic};

/// Prompt asking for six numbered subtopics.
pub fn subtopics_prompt(topic: &Topic) -> String {
    format!(
        "List exactly 6 concise subtopics for the main topic '{}'. \
         Respond with only the subtopics as a numbered list\u{2014}without any introductions, \
         explanations, or additional text.",
        topic
    )
}

/// Prompt asking for a single ~1100 character paragraph.
pub fn description_prompt(subtopic: &Subtopic, topic: &Topic) -> String {
    format!(
        "Write a concise one-paragraph description of 1100 characters for the subtopic '{}' \
         under '{}', without introductory phrases.",
        subtopic, topic
    )
}

/// Text side of the content service: subtopic lists and descriptions.
///
/// Calls are single-shot. Failures propagate to the caller unchanged.
pub struct ContentClient<'a, M: GenerativeModel + ?Sized> {
    model: &'a M,
    model_name: String,
    parser: SubtopicParser,
}

impl<'a, M: GenerativeModel + ?Sized> ContentClient<'a, M> {
    /// Create a client sending text requests to `model_name`.
    pub fn new(model: &'a M, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            parser: SubtopicParser::new(),
        }
    }

    /// Use a custom parser for the subtopic list.
    pub fn with_parser(mut self, parser: SubtopicParser) -> Self {
        self.parser = parser;
        self
    }

    /// Ask for the subtopics of `topic`, in the order the service listed them.
    pub fn subtopics(&self, topic: &Topic) -> Result<Vec<Subtopic>> {
        let text = self.ask(subtopics_prompt(topic))?;
        let subtopics = self.parser.parse(&text)?;
        log::info!("Received {} subtopics for '{}'", subtopics.len(), topic);
        Ok(subtopics)
    }

    /// Ask for a description of `subtopic`; returns the trimmed text.
    pub fn description(&self, subtopic: &Subtopic, topic: &Topic) -> Result<String> {
        let text = self.ask(description_prompt(subtopic, topic))?;
        Ok(text.trim().to_string())
    }

    fn ask(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest::text(self.model_name.as_str(), prompt);
        let response = self.model.generate(&request)?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| Error::EmptyResponse("no text part".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockModel;
    use crate::model::{GenerateResponse, Modality};
    use deckgen_core::ListParsing;

    #[test]
    fn test_subtopics_parsed_in_order() {
        let model = MockModel::new(|_| {
            Ok(GenerateResponse::from_text(
                "1. Solar Power\n2. Wind Energy\n\n3. Hydropower\n4. Geothermal\n5. Biomass\n6. Grid Storage\n",
            ))
        });
        let client = ContentClient::new(&model, "text-model");

        let subtopics = client.subtopics(&Topic::from_input("Sustainable Energy")).unwrap();
        let labels: Vec<&str> = subtopics.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Solar Power",
                "Wind Energy",
                "Hydropower",
                "Geothermal",
                "Biomass",
                "Grid Storage"
            ]
        );

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "text-model");
        assert_eq!(requests[0].modalities, vec![Modality::Text]);
        assert!(requests[0].prompt.contains("'Sustainable Energy'"));
        assert!(requests[0].prompt.contains("exactly 6"));
    }

    #[test]
    fn test_subtopics_empty_response() {
        let model = MockModel::new(|_| Ok(GenerateResponse::from_text("")));
        let client = ContentClient::new(&model, "m");
        assert!(client.subtopics(&Topic::from_input("x")).unwrap().is_empty());
    }

    #[test]
    fn test_subtopics_error_propagates_without_retry() {
        let model = MockModel::new(|_| Err(Error::ServiceOverloaded("busy".into())));
        let client = ContentClient::new(&model, "m");

        let err = client.subtopics(&Topic::from_input("x")).unwrap_err();
        assert!(err.is_overload());
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_strict_parser_rejects_commentary() {
        let model = MockModel::new(|_| {
            Ok(GenerateResponse::from_text("Sure! Here you go:\n1. A\n2. B"))
        });
        let client = ContentClient::new(&model, "m")
            .with_parser(SubtopicParser::new().with_mode(ListParsing::Strict));

        assert!(matches!(
            client.subtopics(&Topic::from_input("x")),
            Err(Error::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn test_description_trimmed_verbatim() {
        let model = MockModel::new(|_| {
            Ok(GenerateResponse::from_text("\n  Solar panels: convert light.  \n"))
        });
        let client = ContentClient::new(&model, "m");

        let description = client
            .description(&Subtopic::new("Solar"), &Topic::from_input("Energy"))
            .unwrap();
        assert_eq!(description, "Solar panels: convert light.");

        let prompt = &model.requests()[0].prompt;
        assert!(prompt.contains("'Solar' under 'Energy'"));
        assert!(prompt.contains("1100 characters"));
    }

    #[test]
    fn test_description_without_text_part() {
        let model = MockModel::new(|_| Ok(GenerateResponse::default()));
        let client = ContentClient::new(&model, "m");

        assert!(matches!(
            client.description(&Subtopic::new("a"), &Topic::from_input("b")),
            Err(Error::EmptyResponse(_))
        ));
    }
}
