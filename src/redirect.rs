//! Host/port-aware redirect normalization.
//!
//! Decides, per request, whether the client is addressing the server at its
//! canonical hostname and scheme. If not, computes the single 301 target
//! that corrects it. Pure functions of (request, policy): no I/O, no state
//! survives across requests, safe to share across connections.
//!
//! Canonical hostname enforcement and plain-HTTP-to-HTTPS upgrade are two
//! independent switches. The application listener runs with `upgrade_scheme`
//! off; the optional plain-HTTP listener runs with it on.

/// Redirect policy, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    /// Canonical hostname to enforce. Empty disables hostname enforcement,
    /// for deployments whose public hostname is not known in advance.
    pub hostname: String,
    /// Port the HTTPS side is reachable on, as shown in redirect targets.
    pub https_port: String,
    /// Send plain requests to HTTPS regardless of which host they used.
    pub upgrade_scheme: bool,
}

/// A Host header split into hostname and optional port.
///
/// Bracketed IPv6 literals keep their brackets so the value can be placed
/// back into a URL unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub host: String,
    pub port: Option<String>,
}

/// Outcome of normalizing one request. Both variants are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Request addresses the server correctly; continue to the next handler.
    Passthrough,
    /// Respond 301 with this Location and stop.
    Redirect(String),
    /// No host on the request and no configured hostname to fall back on.
    /// Surfaced as a 500; guessing a target would be worse than failing.
    MissingHost,
}

/// Split a raw Host header into hostname and port.
///
/// A header that cannot be split cleanly (unterminated IPv6 bracket) is
/// kept whole as the hostname: redirect correctness is best-effort and must
/// never fail the request.
pub fn split_host_port(header: &str) -> HostInfo {
    if let Some(bracket_end) = header.find(']') {
        if !header.starts_with('[') {
            return HostInfo {
                host: header.to_string(),
                port: None,
            };
        }
        let host = &header[..=bracket_end];
        let port = header[bracket_end + 1..]
            .strip_prefix(':')
            .filter(|p| !p.is_empty());
        return HostInfo {
            host: host.to_string(),
            port: port.map(str::to_string),
        };
    }

    if header.contains('[') {
        // Unterminated bracket: degrade to treating it all as hostname.
        return HostInfo {
            host: header.to_string(),
            port: None,
        };
    }

    match header.rsplit_once(':') {
        // Reject a second colon in the host part: that is an unbracketed
        // IPv6 literal, which has no port to strip.
        Some((host, port)) if !host.contains(':') => HostInfo {
            host: host.to_string(),
            port: (!port.is_empty()).then(|| port.to_string()),
        },
        _ => HostInfo {
            host: header.to_string(),
            port: None,
        },
    }
}

/// Decide whether a request needs a redirect to the canonical address.
///
/// `secure` reports whether the connection was TLS-terminated upstream.
/// `path` and `query` are opaque and pass through to the target untouched.
pub fn evaluate(
    policy: &RedirectPolicy,
    secure: bool,
    host_header: &str,
    path: &str,
    query: Option<&str>,
) -> Decision {
    let request = split_host_port(host_header);

    let current_scheme = if secure { "https" } else { "http" };
    let target_scheme = if policy.upgrade_scheme {
        "https"
    } else {
        current_scheme
    };

    // The configured hostname always wins over whatever the client sent.
    // Without either there is nothing to build a redirect from.
    let target_host = if policy.hostname.is_empty() {
        if request.host.is_empty() {
            return Decision::MissingHost;
        }
        request.host.as_str()
    } else {
        policy.hostname.as_str()
    };

    // No hostname enforcement and no scheme change: nothing to normalize.
    if policy.hostname.is_empty() && !policy.upgrade_scheme {
        return Decision::Passthrough;
    }

    // Crossing schemes moves the request to the HTTPS listener's port.
    // Otherwise whatever port the client used is kept as-is.
    let target_port = if policy.upgrade_scheme && current_scheme != target_scheme {
        Some(policy.https_port.as_str())
    } else {
        request.port.as_deref()
    };

    let target = format_url(target_scheme, target_host, target_port, path, query);
    let current = format_url(
        current_scheme,
        &request.host,
        request.port.as_deref(),
        path,
        query,
    );

    // Redirecting to the address the client already used would loop.
    if target == current {
        Decision::Passthrough
    } else {
        Decision::Redirect(target)
    }
}

/// Build `scheme://host[:port]path[?query]`, omitting the port when it is
/// the scheme's default (80 for http, 443 for https).
fn format_url(
    scheme: &str,
    host: &str,
    port: Option<&str>,
    path: &str,
    query: Option<&str>,
) -> String {
    let default_port = if scheme == "https" { "443" } else { "80" };

    let mut url = format!("{scheme}://{host}");
    if let Some(port) = port {
        if port != default_port {
            url.push(':');
            url.push_str(port);
        }
    }
    url.push_str(path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(hostname: &str, https_port: &str, upgrade_scheme: bool) -> RedirectPolicy {
        RedirectPolicy {
            hostname: hostname.to_string(),
            https_port: https_port.to_string(),
            upgrade_scheme,
        }
    }

    #[test]
    fn test_split_plain_host() {
        assert_eq!(
            split_host_port("www.test.com"),
            HostInfo {
                host: "www.test.com".to_string(),
                port: None,
            }
        );
    }

    #[test]
    fn test_split_host_with_port() {
        assert_eq!(
            split_host_port("www.test.com:4000"),
            HostInfo {
                host: "www.test.com".to_string(),
                port: Some("4000".to_string()),
            }
        );
    }

    #[test]
    fn test_split_trailing_colon() {
        assert_eq!(
            split_host_port("www.test.com:"),
            HostInfo {
                host: "www.test.com".to_string(),
                port: None,
            }
        );
    }

    #[test]
    fn test_split_bracketed_ipv6() {
        assert_eq!(
            split_host_port("[::1]:8080"),
            HostInfo {
                host: "[::1]".to_string(),
                port: Some("8080".to_string()),
            }
        );
        assert_eq!(
            split_host_port("[2001:db8::1]"),
            HostInfo {
                host: "[2001:db8::1]".to_string(),
                port: None,
            }
        );
    }

    #[test]
    fn test_split_malformed_ipv6_degrades_to_hostname() {
        // Unterminated bracket: keep the whole header, do not fail.
        assert_eq!(
            split_host_port("[::1"),
            HostInfo {
                host: "[::1".to_string(),
                port: None,
            }
        );
    }

    #[test]
    fn test_split_unbracketed_ipv6() {
        assert_eq!(
            split_host_port("::1"),
            HostInfo {
                host: "::1".to_string(),
                port: None,
            }
        );
    }

    /// Hostname enforcement without scheme upgrade, mirroring the behavior
    /// of the application listener.
    #[test]
    fn test_hostname_enforcement() {
        struct Case {
            name: &'static str,
            secure: bool,
            host: &'static str,
            hostname: &'static str,
            path: &'static str,
            want: Decision,
        }

        let cases = [
            Case {
                name: "host; no hostname",
                secure: false,
                host: "www.test.com",
                hostname: "",
                path: "/",
                want: Decision::Passthrough,
            },
            Case {
                name: "host; no hostname; non-standard port",
                secure: false,
                host: "www.test.com:4000",
                hostname: "",
                path: "/",
                want: Decision::Passthrough,
            },
            Case {
                name: "no host; no hostname",
                secure: false,
                host: "",
                hostname: "",
                path: "/",
                want: Decision::MissingHost,
            },
            Case {
                name: "no host; hostname",
                secure: false,
                host: "",
                hostname: "www.test.com",
                path: "/",
                want: Decision::Redirect("http://www.test.com/".to_string()),
            },
            Case {
                name: "same host and hostname",
                secure: false,
                host: "www.test.com",
                hostname: "www.test.com",
                path: "/",
                want: Decision::Passthrough,
            },
            Case {
                name: "same host and hostname; non-standard port",
                secure: true,
                host: "www.test.com:4000",
                hostname: "www.test.com",
                path: "/",
                want: Decision::Passthrough,
            },
            Case {
                name: "different host and hostname; with path",
                secure: false,
                host: "www.foo.com",
                hostname: "www.test.com",
                path: "/foo/edit",
                want: Decision::Redirect("http://www.test.com/foo/edit".to_string()),
            },
            Case {
                name: "different host and hostname; non-standard port; https",
                secure: true,
                host: "www.foo.com:4000",
                hostname: "www.test.com",
                path: "",
                want: Decision::Redirect("https://www.test.com:4000".to_string()),
            },
            Case {
                name: "different host and hostname; default port stays hidden",
                secure: true,
                host: "www.foo.com:443",
                hostname: "www.test.com",
                path: "/",
                want: Decision::Redirect("https://www.test.com/".to_string()),
            },
        ];

        for case in &cases {
            let got = evaluate(
                &policy(case.hostname, "443", false),
                case.secure,
                case.host,
                case.path,
                None,
            );
            assert_eq!(got, case.want, "case: {}", case.name);
        }
    }

    /// Scheme upgrade, mirroring the behavior of the plain HTTP listener.
    #[test]
    fn test_scheme_upgrade() {
        struct Case {
            name: &'static str,
            host: &'static str,
            hostname: &'static str,
            https_port: &'static str,
            path: &'static str,
            want: Decision,
        }

        let cases = [
            Case {
                name: "no host; no hostname",
                host: "",
                hostname: "",
                https_port: "443",
                path: "/",
                want: Decision::MissingHost,
            },
            Case {
                name: "no host; default hostname",
                host: "",
                hostname: "www.test.com",
                https_port: "443",
                path: "/",
                want: Decision::Redirect("https://www.test.com/".to_string()),
            },
            Case {
                name: "no host; default hostname; path",
                host: "",
                hostname: "www.test.com",
                https_port: "443",
                path: "/foo/edit",
                want: Decision::Redirect("https://www.test.com/foo/edit".to_string()),
            },
            Case {
                name: "non-standard port",
                host: "",
                hostname: "www.test.com",
                https_port: "4001",
                path: "/",
                want: Decision::Redirect("https://www.test.com:4001/".to_string()),
            },
            Case {
                name: "with host; no hostname",
                host: "www.test.com",
                hostname: "",
                https_port: "443",
                path: "",
                want: Decision::Redirect("https://www.test.com".to_string()),
            },
            Case {
                name: "with host; non-standard port; path",
                host: "www.test.com",
                hostname: "",
                https_port: "4001",
                path: "/foo/edit",
                want: Decision::Redirect("https://www.test.com:4001/foo/edit".to_string()),
            },
            Case {
                name: "with host and hostname",
                host: "www.test.com",
                hostname: "www.something-else.com",
                https_port: "443",
                path: "",
                want: Decision::Redirect("https://www.something-else.com".to_string()),
            },
        ];

        for case in &cases {
            let got = evaluate(
                &policy(case.hostname, case.https_port, true),
                false,
                case.host,
                case.path,
                None,
            );
            assert_eq!(got, case.want, "case: {}", case.name);
        }
    }

    #[test]
    fn test_query_preserved() {
        let got = evaluate(
            &policy("www.test.com", "443", false),
            false,
            "www.foo.com",
            "/foo/edit",
            Some("draft=1"),
        );
        assert_eq!(
            got,
            Decision::Redirect("http://www.test.com/foo/edit?draft=1".to_string())
        );
    }

    #[test]
    fn test_ipv6_host_redirect() {
        let got = evaluate(
            &policy("www.test.com", "443", false),
            false,
            "[::1]:8080",
            "/",
            None,
        );
        assert_eq!(
            got,
            Decision::Redirect("http://www.test.com:8080/".to_string())
        );
    }

    /// Re-evaluating the normalizer against its own redirect target must
    /// pass through, otherwise clients would loop forever.
    #[test]
    fn test_no_redirect_loop() {
        let enforce = policy("www.test.com", "4001", false);
        let upgrade = policy("www.test.com", "4001", true);

        // Plain request lands on the upgrade listener and gets bounced.
        let first = evaluate(&upgrade, false, "www.foo.com", "/foo/edit", None);
        let Decision::Redirect(location) = first else {
            panic!("expected redirect, got {first:?}");
        };
        assert_eq!(location, "https://www.test.com:4001/foo/edit");

        // The corrected request arrives on the secure listener.
        let second = evaluate(&enforce, true, "www.test.com:4001", "/foo/edit", None);
        assert_eq!(second, Decision::Passthrough);
    }
}
