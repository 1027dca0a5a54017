//! Candidate script name generation.
//!
//! Given a request descriptor and a parsed resource type, produces the
//! ordered sequence of script names to probe. Ordering is the contract:
//! most selectors first, then fewer, then the selector-free forms; within a
//! level, extension-qualified forms precede unqualified ones, and for the
//! default methods the method-free form precedes the method-qualified one
//! at the same specificity.
//!
//! Generation is lazy per specificity level, so a resolution that matches
//! an early candidate never pays for the rest of a long selector chain.

use crate::request::RequestDescriptor;
use crate::resource_type::ResourceType;

/// Ordered candidate script names for `request` against `resource_type`.
///
/// Calling this twice with identical inputs yields identical sequences;
/// there is no hidden state.
pub fn candidates<'a>(
    request: &'a RequestDescriptor,
    resource_type: &'a ResourceType,
) -> impl Iterator<Item = String> + 'a {
    let selector_counts = (1..=request.selectors.len()).rev().map(Some);

    selector_counts
        .chain(std::iter::once(None))
        .flat_map(move |count| level_candidates(request, resource_type, count))
}

/// Candidates for one specificity level.
///
/// `count` is the number of leading selectors to include; `None` is the
/// selector-free level, which substitutes the type's last dot-separated
/// segment for the selector portion in the method-free form.
fn level_candidates(
    request: &RequestDescriptor,
    resource_type: &ResourceType,
    count: Option<usize>,
) -> Vec<String> {
    let type_name = resource_type.type_name();
    let base = match resource_type.version() {
        Some(version) => format!("{type_name}/{version}/"),
        None => format!("{type_name}/"),
    };
    let method = &request.method;

    let (with_method, without_method) = match count {
        Some(count) => {
            let joined = request.selectors[..count].join("/");
            (format!("{base}{method}.{joined}"), format!("{base}{joined}"))
        }
        None => {
            let last_segment = match type_name.rfind('.') {
                Some(pos) => &type_name[pos + 1..],
                None => type_name,
            };
            (format!("{base}{method}"), format!("{base}{last_segment}"))
        }
    };

    let default_method = request.is_default_method();
    let extension = request.extension.as_deref().filter(|ext| !ext.is_empty());

    let mut out = Vec::with_capacity(4);
    if let Some(ext) = extension {
        if default_method {
            out.push(format!("{without_method}.{ext}"));
        }
        out.push(format!("{with_method}.{ext}"));
    }
    if default_method {
        out.push(without_method);
    }
    out.push(with_method);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(request: &RequestDescriptor, raw_type: &str) -> Vec<String> {
        let rt = ResourceType::parse(raw_type).unwrap();
        candidates(request, &rt).collect()
    }

    #[test]
    fn test_default_method_with_selectors_and_extension() {
        let request = RequestDescriptor::new("GET")
            .with_selectors(["x", "y"])
            .with_extension("html");

        assert_eq!(
            collect(&request, "a/b"),
            vec![
                "a/b/x/y.html",
                "a/b/GET.x/y.html",
                "a/b/x/y",
                "a/b/GET.x/y",
                "a/b/x.html",
                "a/b/GET.x.html",
                "a/b/x",
                "a/b/GET.x",
                "a/b/a/b.html",
                "a/b/GET.html",
                "a/b/a/b",
                "a/b/GET",
            ]
        );
    }

    #[test]
    fn test_non_default_method_skips_method_free_forms() {
        let request = RequestDescriptor::new("POST")
            .with_selectors(["print"])
            .with_extension("html");

        assert_eq!(
            collect(&request, "a/b"),
            vec![
                "a/b/POST.print.html",
                "a/b/POST.print",
                "a/b/POST.html",
                "a/b/POST",
            ]
        );
    }

    #[test]
    fn test_versioned_type_inserts_version_segment() {
        let request = RequestDescriptor::new("GET");

        assert_eq!(
            collect(&request, "a/b/1.0.0"),
            vec!["a/b/1.0.0/a/b", "a/b/1.0.0/GET"]
        );
    }

    #[test]
    fn test_version_is_normalized_in_base() {
        let request = RequestDescriptor::new("GET");

        assert_eq!(collect(&request, "a/b/2"), vec!["a/b/2.0.0/a/b", "a/b/2.0.0/GET"]);
    }

    #[test]
    fn test_package_style_type_uses_dot_segment() {
        let request = RequestDescriptor::new("GET").with_extension("html");

        assert_eq!(
            collect(&request, "com.example.widget"),
            vec![
                "com.example.widget/widget.html",
                "com.example.widget/GET.html",
                "com.example.widget/widget",
                "com.example.widget/GET",
            ]
        );
    }

    #[test]
    fn test_no_extension_no_selectors() {
        let request = RequestDescriptor::new("GET");

        assert_eq!(collect(&request, "a"), vec!["a/a", "a/GET"]);
    }

    #[test]
    fn test_empty_extension_treated_as_absent() {
        let request = RequestDescriptor::new("GET").with_extension("");

        assert_eq!(collect(&request, "a"), vec!["a/a", "a/GET"]);
    }

    #[test]
    fn test_more_specific_levels_enumerate_first() {
        let request = RequestDescriptor::new("GET")
            .with_selectors(["x", "y"])
            .with_extension("html");
        let all = collect(&request, "a/b");

        let last_two_selector = all
            .iter()
            .rposition(|c| c.contains("x/y"))
            .expect("two-selector forms present");
        let first_one_selector = all
            .iter()
            .position(|c| c.contains('x') && !c.contains("x/y"))
            .expect("one-selector forms present");
        assert!(last_two_selector < first_one_selector);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let request = RequestDescriptor::new("HEAD")
            .with_selectors(["p", "q", "r"])
            .with_extension("json");
        let rt = ResourceType::parse("x/y/z/3.1.4").unwrap();

        let first: Vec<String> = candidates(&request, &rt).collect();
        let second: Vec<String> = candidates(&request, &rt).collect();
        assert_eq!(first, second);
    }
}
