use std::fmt;

/// The syntactic class of a host subcomponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKind {
    /// A dotted-quad IPv4 address.
    Ipv4,
    /// A bracketed IPv6 address, possibly with a zone identifier.
    Ipv6,
    /// A bracketed address of a future version.
    IpvFuture,
    /// A registered name.
    RegName,
}

/// The decomposed components of a URI reference.
///
/// Every field distinguishes an absent component (`None`) from a
/// present-but-empty one (`Some("")`): `http://example.com` has no
/// query, while `http://example.com?` has an empty one.
///
/// The `Display` implementation recomposes the components into a URI
/// reference. When any of `userinfo`, `host` or `port` is present, the
/// decomposed triple takes precedence over the raw `authority` text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Components<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub userinfo: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<&'a str>,
    pub path: Option<&'a str>,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl fmt::Display for Components<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if self.userinfo.is_some() || self.host.is_some() || self.port.is_some() {
            f.write_str("//")?;
            if let Some(userinfo) = self.userinfo {
                write!(f, "{}@", userinfo)?;
            }
            if let Some(host) = self.host {
                f.write_str(host)?;
            }
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        } else if let Some(authority) = self.authority {
            write!(f, "//{}", authority)?;
        }
        if let Some(path) = self.path {
            f.write_str(path)?;
        }
        if let Some(query) = self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
