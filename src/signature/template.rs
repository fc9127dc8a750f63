// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! XML fragments of the detached signature document.
//!
//! Whitespace within these fragments is significant, signed and timestamped bytes are derived from them directly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub(crate) const C14N_URI: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";
pub(crate) const SHA256_DIGEST_URI: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

const BASE64_LINE_LENGTH: usize = 76;

/// Encodes data as base64, split into lines of 76 characters with no trailing delimiter.
pub(crate) fn base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_LENGTH);

    // Base64 output is ASCII so byte chunks are always on character boundaries.
    for (index, chunk) in encoded.as_bytes().chunks(BASE64_LINE_LENGTH).enumerate() {
        if index != 0 {
            wrapped.push('\n');
        }
        wrapped.extend(chunk.iter().map(|byte| *byte as char));
    }

    wrapped
}

pub(crate) fn certificate(der_b64: &str) -> String {
    format!("<X509Certificate>{der_b64}</X509Certificate>")
}

pub(crate) fn file_reference(uri: &str, digest_b64: &str) -> String {
    format!(
        "<Reference URI=\"{uri}\"><DigestMethod Algorithm=\"{SHA256_DIGEST_URI}\"></DigestMethod>\
         <DigestValue>{digest_b64}</DigestValue></Reference>"
    )
}

pub(crate) fn package_manifest(references: &str) -> String {
    format!("<Manifest xmlns=\"http://www.w3.org/2000/09/xmldsig#\" Id=\"PackageContents\">{references}</Manifest>")
}

pub(crate) fn signed_info(signature_method: &str, manifest_digest_b64: &str) -> String {
    format!(
        "<SignedInfo xmlns=\"http://www.w3.org/2000/09/xmldsig#\">\
         <CanonicalizationMethod Algorithm=\"{C14N_URI}\"></CanonicalizationMethod>\
         <SignatureMethod Algorithm=\"{signature_method}\"></SignatureMethod>\
         <Reference URI=\"#PackageContents\">\
         <Transforms><Transform Algorithm=\"{C14N_URI}\"></Transform></Transforms>\
         <DigestMethod Algorithm=\"{SHA256_DIGEST_URI}\"></DigestMethod>\
         <DigestValue>{manifest_digest_b64}</DigestValue>\
         </Reference>\
         </SignedInfo>"
    )
}

pub(crate) fn signature_value(signature_b64: &str) -> String {
    format!(
        "<SignatureValue xmlns=\"http://www.w3.org/2000/09/xmldsig#\" Id=\"PackageSignatureValue\">{signature_b64}</SignatureValue>"
    )
}

pub(crate) fn timestamp_object(uri: &str, token_b64: &str) -> String {
    let mut xml = String::new();
    xml.push_str("<Object xmlns:xades=\"http://uri.etsi.org/01903/v1.1.1#\" > \n");
    xml.push_str("  <xades:QualifyingProperties>\n");
    xml.push_str("    <xades:UnsignedProperties > \n");
    xml.push_str("      <xades:UnsignedSignatureProperties>\n");
    xml.push_str("        <xades:SignatureTimeStamp>\n");
    xml.push_str(&format!("     \t  <xades:HashDataInfo uri=\"{uri}\">\n"));
    xml.push_str("     \t    <Transforms>\n");
    xml.push_str(&format!("          \t  <Transform Algorithm=\"{C14N_URI}\"/>\n"));
    xml.push_str("            </Transforms>\n");
    xml.push_str("            <xades:EncapsulatedTimeStamp>\n");
    xml.push_str(&format!("              {token_b64}\n"));
    xml.push_str("            </xades:EncapsulatedTimeStamp>     \t\n");
    xml.push_str("     \t  </xades:HashDataInfo>     \t\n");
    xml.push_str("        </xades:SignatureTimeStamp>\n");
    xml.push_str("      </xades:UnsignedSignatureProperties> \n");
    xml.push_str("    </xades:UnsignedProperties>\n");
    xml.push_str("  </xades:QualifyingProperties>\n");
    xml.push_str("</Object>");
    xml
}

pub(crate) struct Document<'a> {
    pub(crate) signature_method: &'a str,
    pub(crate) manifest_digest_b64: &'a str,
    pub(crate) signature_b64: &'a str,
    pub(crate) key_info: &'a str,
    pub(crate) references: &'a str,
    pub(crate) timestamps: &'a str,
}

impl Document<'_> {
    pub(crate) fn render(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<signatures>\n");
        xml.push_str("  <Signature xmlns=\"http://www.w3.org/2000/09/xmldsig#\" Id=\"PackageSignature\">\n");
        xml.push_str("    <SignedInfo>\n");
        xml.push_str(&format!("      <CanonicalizationMethod Algorithm=\"{C14N_URI}\"/>\n"));
        xml.push_str(&format!("      <SignatureMethod Algorithm=\"{}\"/>\n", self.signature_method));
        xml.push_str("      <Reference URI=\"#PackageContents\">\n");
        xml.push_str("        <Transforms>\n");
        xml.push_str(&format!("          <Transform Algorithm=\"{C14N_URI}\"/>\n"));
        xml.push_str("        </Transforms>\n");
        xml.push_str(&format!("        <DigestMethod Algorithm=\"{SHA256_DIGEST_URI}\"/>\n"));
        xml.push_str(&format!("        <DigestValue>{}</DigestValue>\n", self.manifest_digest_b64));
        xml.push_str("      </Reference>\n");
        xml.push_str("    </SignedInfo>\n");
        xml.push_str(&format!("    <SignatureValue Id=\"PackageSignatureValue\">{}</SignatureValue>\n", self.signature_b64));
        xml.push_str("    <KeyInfo>\n");
        xml.push_str("      <X509Data>\n");
        xml.push_str(&format!("        {}\n", self.key_info));
        xml.push_str("      </X509Data>\n");
        xml.push_str("    </KeyInfo>\n");
        xml.push_str("    <Object>\n");
        xml.push_str("      <Manifest Id=\"PackageContents\">\n");
        xml.push_str(&format!("        {}\n", self.references));
        xml.push_str("      </Manifest>\n");
        xml.push_str("    </Object>\n");
        xml.push_str(&format!("    {}\n", self.timestamps));
        xml.push_str("  </Signature>\n");
        xml.push_str("</signatures>\n");
        xml
    }
}
