use docscan_core::DocumentField;

/// Instruction sent alongside every image. The model answers in Portuguese
/// field labels, so the list below doubles as the structured-result schema.
pub fn extraction_instruction() -> String {
    let mut prompt = String::from(
        "Você é um extrator de documentos brasileiros. \
         A imagem pode ser um RG, uma CNH ou uma Certidão de Nascimento. \
         Classifique o tipo de documento (RG, CNH ou Certidão de Nascimento) \
         e depois extraia os dados relevantes.\n\
         Extraia os seguintes campos, se disponíveis, usando exatamente estes nomes como chaves:\n\n",
    );

    for field in DocumentField::ALL {
        prompt.push_str("- ");
        prompt.push_str(field.key());
        if let Some(hint) = field_hint(field) {
            prompt.push_str(" (");
            prompt.push_str(hint);
            prompt.push(')');
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "\nResponda SOMENTE com um objeto JSON válido cujos valores sejam textos, e nada mais. \
         Não inclua explicações. Envolva o conteúdo com três crases seguidas de json no início \
         e três crases no fim, assim:\n```json\n{ \"Tipo de Documento\": \"RG\" }\n```",
    );
    prompt
}

fn field_hint(field: DocumentField) -> Option<&'static str> {
    match field {
        DocumentField::DocumentNumber => Some("RG ou CNH"),
        DocumentField::Cpf => Some("se presente"),
        DocumentField::IssuingAuthority => Some("RG"),
        DocumentField::LicenseCategory => Some("CNH"),
        DocumentField::MotherName | DocumentField::FatherName => Some("Certidão"),
        _ => None,
    }
}

/// Inline image reference. The media type is always declared as JPEG; the
/// endpoint sniffs the real encoding.
pub fn image_data_uri(image_b64: &str) -> String {
    format!("data:image/jpeg;base64,{image_b64}")
}
