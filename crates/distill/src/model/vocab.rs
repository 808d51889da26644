//! Vocabulary IRIs used by the core.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const NIF: &str = "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#";
pub const KS: &str = "http://dkm.fbk.eu/ontologies/knowledgestore#";
pub const KEMT: &str = "http://knowledgestore.fbk.eu/ontologies/kem/text#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

pub const NIF_CONTEXT: &str = "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#Context";
pub const NIF_SOURCE_URL: &str =
    "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#sourceUrl";
pub const NIF_IS_STRING: &str =
    "http://persistence.uni-leipzig.org/nlp2rdf/ontologies/nif-core#isString";

pub const KS_RESOURCE: &str = "http://dkm.fbk.eu/ontologies/knowledgestore#Resource";
pub const KEMT_TEXT_RESOURCE: &str = "http://knowledgestore.fbk.eu/ontologies/kem/text#TextResource";

/// Prefixes every resource may use without declaring them.
pub const BUILTIN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("nif", NIF),
    ("ks", KS),
    ("kemt", KEMT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_share_namespaces() {
        assert!(RDF_TYPE.starts_with(RDF));
        assert!(XSD_STRING.starts_with(XSD));
        assert!(NIF_CONTEXT.starts_with(NIF));
        assert!(NIF_SOURCE_URL.starts_with(NIF));
        assert!(NIF_IS_STRING.starts_with(NIF));
        assert!(KS_RESOURCE.starts_with(KS));
        assert!(KEMT_TEXT_RESOURCE.starts_with(KEMT));
    }
}
