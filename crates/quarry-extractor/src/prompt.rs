//! Prompt engineering for query extraction

use quarry_domain::{QueryDescriptor, SchemaField, COLLECTION_NAME};

/// Opening of the instruction envelope
pub const INSTRUCTION_OPEN: &str = "<s>[INST]";

/// Closing of the instruction envelope; model output follows it
pub const INSTRUCTION_CLOSE: &str = "[/INST]";

/// Order in which the value-shape rules are listed
const INFERENCE_ORDER: [SchemaField; 6] = [
    SchemaField::Country,
    SchemaField::StockCode,
    SchemaField::InvoiceNo,
    SchemaField::CustomerId,
    SchemaField::Description,
    SchemaField::Quantity,
];

const ROLE_INSTRUCTIONS: &str = "You are an intelligent assistant that converts any natural language question into a structured MongoDB query format by inferring the correct field and value based on context and data type, not predefined keywords.";

const WORKED_EXAMPLE: &str = r#"Examples
Natural Language Query: What are the first 10 sales from Germany?
Inferred Field: Country
Output:
{"collection_name": "sales", "field_name": "Country", "field_value": "Germany", "limit": 10}"#;

/// Wrap a rendered prompt in the model's chat envelope
pub fn wrap_instruction(prompt: &str) -> String {
    format!("{} {} {}", INSTRUCTION_OPEN, prompt, INSTRUCTION_CLOSE)
}

/// Builds the question-to-descriptor prompt
///
/// Any question is accepted, including an empty one.
pub struct QueryPromptBuilder {
    question: String,
}

impl QueryPromptBuilder {
    /// Create a new prompt builder
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    /// Build the prompt without the chat envelope
    pub fn build(&self) -> String {
        let mut prompt = String::from("\n");

        prompt.push_str(ROLE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 1. Data context
        prompt.push_str("Data Context\n");
        prompt.push_str(&format!(
            "The database collection is named \"{}\".\n",
            COLLECTION_NAME
        ));
        prompt.push_str("Fields and their expected content types:\n\n");
        for field in SchemaField::ALL {
            prompt.push_str(&format!("- {}: {}\n", field.name(), field.description()));
        }
        prompt.push('\n');

        // 2. Rules
        prompt.push_str("Rules\n");
        prompt.push_str("1. Output Format:\n");
        prompt.push_str("   Return ONLY a valid JSON object with the following keys:\n");
        prompt.push_str("   collection_name, field_name, field_value, limit\n\n");

        prompt.push_str("2. Collection Name:\n");
        prompt.push_str(&format!("   Always set to \"{}\"\n\n", COLLECTION_NAME));

        prompt.push_str("3. Field Mapping (Inference ONLY):\n");
        prompt.push_str(
            "   Determine the field_name solely based on the nature of the value, not on predefined keywords.\n",
        );
        for field in INFERENCE_ORDER {
            prompt.push_str(&format!("   - {} → {}\n", field.inference_rule(), field.name()));
        }
        prompt.push('\n');

        prompt.push_str("4. Limit:\n");
        prompt.push_str("   Detect the number of requested results (e.g., \"top 5\", \"limit 10\").\n");
        prompt.push_str("   Default: 1\n\n");

        prompt.push_str("5. Defaults (if uncertain):\n");
        prompt.push_str(&render_defaults());
        prompt.push_str("\n\n");

        prompt.push_str("6. Response Constraint:\n");
        prompt.push_str("   Respond ONLY with the JSON object.\n");
        prompt.push_str("   Do NOT include explanations, prefixes, or extra text.\n\n");

        // 3. Worked example and the question itself
        prompt.push_str(WORKED_EXAMPLE);
        prompt.push_str("\n\n");
        prompt.push_str("User Question:\n");
        prompt.push_str(&format!("\"{}\"\n", self.question));

        prompt
    }

    /// Build the prompt wrapped in the instruction envelope
    pub fn build_with_envelope(&self) -> String {
        wrap_instruction(&self.build())
    }
}

/// Default descriptor, pretty-printed and indented under its rule
fn render_defaults() -> String {
    let pretty = serde_json::to_string_pretty(&QueryDescriptor::default())
        .unwrap_or_else(|_| "{}".to_string());
    pretty
        .lines()
        .map(|line| format!("   {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
