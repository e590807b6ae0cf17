//! Capability and catalog documents used across adapter tests.

pub const CSW_ISO_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetRecordsResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
    xmlns:gmd="http://www.isotc211.org/2005/gmd"
    xmlns:gco="http://www.isotc211.org/2005/gco" version="2.0.2">
  <csw:SearchStatus timestamp="2024-03-01T10:00:00Z"/>
  <csw:SearchResults numberOfRecordsMatched="1" numberOfRecordsReturned="1" nextRecord="0" recordSchema="http://www.isotc211.org/2005/gmd" elementSet="full">
    <gmd:MD_Metadata>
      <gmd:fileIdentifier><gco:CharacterString>8f2d6c1e-roads</gco:CharacterString></gmd:fileIdentifier>
      <gmd:dateStamp><gco:DateTime>2023-11-20T08:15:00</gco:DateTime></gmd:dateStamp>
      <gmd:referenceSystemInfo>
        <gmd:MD_ReferenceSystem>
          <gmd:referenceSystemIdentifier>
            <gmd:RS_Identifier>
              <gmd:code><gco:CharacterString>WGS 1984</gco:CharacterString></gmd:code>
            </gmd:RS_Identifier>
          </gmd:referenceSystemIdentifier>
        </gmd:MD_ReferenceSystem>
      </gmd:referenceSystemInfo>
      <gmd:identificationInfo>
        <gmd:MD_DataIdentification>
          <gmd:citation><gmd:CI_Citation><gmd:title><gco:CharacterString>Road network</gco:CharacterString></gmd:title></gmd:CI_Citation></gmd:citation>
          <gmd:extent>
            <gmd:EX_Extent>
              <gmd:geographicElement>
                <gmd:EX_GeographicBoundingBox>
                  <gmd:westBoundLongitude><gco:Decimal>5.95</gco:Decimal></gmd:westBoundLongitude>
                  <gmd:eastBoundLongitude><gco:Decimal>10.49</gco:Decimal></gmd:eastBoundLongitude>
                  <gmd:southBoundLatitude><gco:Decimal>45.82</gco:Decimal></gmd:southBoundLatitude>
                  <gmd:northBoundLatitude><gco:Decimal>47.81</gco:Decimal></gmd:northBoundLatitude>
                </gmd:EX_GeographicBoundingBox>
              </gmd:geographicElement>
            </gmd:EX_Extent>
          </gmd:extent>
        </gmd:MD_DataIdentification>
      </gmd:identificationInfo>
    </gmd:MD_Metadata>
  </csw:SearchResults>
</csw:GetRecordsResponse>"#;

pub const CSW_DC_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetRecordsResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:dct="http://purl.org/dc/terms/"
    xmlns:ows="http://www.opengis.net/ows" version="2.0.2">
  <csw:SearchStatus timestamp="2024-03-01T10:00:00Z"/>
  <csw:SearchResults numberOfRecordsMatched="12" numberOfRecordsReturned="2" nextRecord="3" elementSet="full">
    <csw:Record>
      <dc:identifier>urn:catalog:states</dc:identifier>
      <dc:title>USA Population</dc:title>
      <dc:type>dataset</dc:type>
      <dc:subject>census</dc:subject>
      <dc:subject>population</dc:subject>
      <dc:subject>boundaries</dc:subject>
      <dc:URI protocol="OGC:WMS-1.1.1-http-get-map" name="topp:states" description="USA Population">http://demo.example.org/geoserver/wms</dc:URI>
      <dct:abstract>Number of persons per state.</dct:abstract>
      <dct:references scheme="WWW:LINK">http://demo.example.org/states.html</dct:references>
      <dct:references>http://demo.example.org/states.zip</dct:references>
      <ows:BoundingBox crs="urn:ogc:def:crs:EPSG:6.6:4326">
        <ows:LowerCorner>24.95 -124.73</ows:LowerCorner>
        <ows:UpperCorner>49.37 -66.97</ows:UpperCorner>
      </ows:BoundingBox>
    </csw:Record>
    <csw:Record>
      <dc:identifier>urn:catalog:coast</dc:identifier>
      <dc:title>Coastline</dc:title>
      <dc:subject>shoreline</dc:subject>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>-10.5 35.0</ows:LowerCorner>
        <ows:UpperCorner>30.25 71.5</ows:UpperCorner>
      </ows:WGS84BoundingBox>
    </csw:Record>
  </csw:SearchResults>
</csw:GetRecordsResponse>"#;

pub const CSW_EXCEPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows" version="1.2.0">
  <ows:Exception exceptionCode="NoApplicableCode" locator="NoApplicableCode">
    <ows:ExceptionText>Unknown queryable: AnyTxt</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;

pub const CSW_EXCEPTION_WITHOUT_TEXT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows" version="1.2.0">
  <ows:Exception exceptionCode="NoApplicableCode"/>
</ows:ExceptionReport>"#;

pub const CSW_RECORD_BY_ID_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<csw:GetRecordByIdResponse xmlns:csw="http://www.opengis.net/cat/csw/2.0.2"
    xmlns:dc="http://purl.org/dc/elements/1.1/">
  <csw:Record>
    <dc:identifier>urn:catalog:states</dc:identifier>
    <dc:title>USA Population</dc:title>
  </csw:Record>
</csw:GetRecordByIdResponse>"#;

/// Five named leaves; `topp:census` is a named group and must not be listed.
pub const WMS_CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms"
    xmlns:xlink="http://www.w3.org/1999/xlink">
  <Service>
    <Name>WMS</Name>
    <Title>Demo map server</Title>
  </Service>
  <Capability>
    <Request>
      <GetCapabilities>
        <Format>text/xml</Format>
        <DCPType><HTTP><Get><OnlineResource xlink:type="simple" xlink:href="http://demo.example.org/geoserver/ows?SERVICE=WMS&amp;"/></Get></HTTP></DCPType>
      </GetCapabilities>
      <GetMap>
        <Format>image/png</Format>
        <DCPType><HTTP><Get><OnlineResource xlink:type="simple" xlink:href="http://demo.example.org/geoserver/wms?SERVICE=WMS&amp;"/></Get></HTTP></DCPType>
      </GetMap>
    </Request>
    <Layer>
      <Title>Demo layers</Title>
      <CRS>EPSG:4326</CRS>
      <CRS>EPSG:3857</CRS>
      <CRS>CRS:84</CRS>
      <EX_GeographicBoundingBox>
        <westBoundLongitude>-180</westBoundLongitude>
        <eastBoundLongitude>180</eastBoundLongitude>
        <southBoundLatitude>-90</southBoundLatitude>
        <northBoundLatitude>90</northBoundLatitude>
      </EX_GeographicBoundingBox>
      <Layer queryable="1">
        <Name>topp:states</Name>
        <Title>USA Population</Title>
        <Abstract>Number of persons per state.</Abstract>
        <EX_GeographicBoundingBox>
          <westBoundLongitude>-124.73</westBoundLongitude>
          <eastBoundLongitude>-66.97</eastBoundLongitude>
          <southBoundLatitude>24.95</southBoundLatitude>
          <northBoundLatitude>49.37</northBoundLatitude>
        </EX_GeographicBoundingBox>
      </Layer>
      <Layer>
        <Name>topp:census</Name>
        <Title>Census group</Title>
        <Layer>
          <Name>topp:tracts</Name>
          <Title>Census tracts</Title>
        </Layer>
        <Layer>
          <Title>Unnamed placeholder</Title>
        </Layer>
        <Layer>
          <Title>Nested group</Title>
          <Layer>
            <Name>topp:blocks</Name>
            <Title>Census blocks</Title>
          </Layer>
        </Layer>
      </Layer>
      <Layer>
        <Name>tiger:roads</Name>
        <Title>Manhattan roads</Title>
        <Abstract>Highway network of Manhattan.</Abstract>
      </Layer>
      <Layer>
        <Name>nurc:mosaic</Name>
        <Title>Mosaic</Title>
        <Abstract>Satellite imagery of the state of Washington.</Abstract>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

pub const WMS_111_CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WMT_MS_Capabilities SYSTEM "http://schemas.opengis.net/wms/1.1.1/WMS_MS_Capabilities.dtd"
 [
 <!ELEMENT VendorSpecificCapabilities EMPTY>
 ]>
<WMT_MS_Capabilities version="1.1.1">
  <Capability>
    <Request>
      <GetMap>
        <DCPType><HTTP><Get><OnlineResource xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="http://legacy.example.org/wms?"/></Get></HTTP></DCPType>
      </GetMap>
    </Request>
    <Layer>
      <Title>Legacy</Title>
      <SRS>EPSG:4326</SRS>
      <Layer>
        <Name>legacy:rivers</Name>
        <Title>Rivers</Title>
        <LatLonBoundingBox minx="-10" miny="35" maxx="30" maxy="70"/>
      </Layer>
    </Layer>
  </Capability>
</WMT_MS_Capabilities>"#;

pub const WMS_DESCRIBE_LAYER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WMS_DescribeLayerResponse SYSTEM "http://demo.example.org/geoserver/schemas/wms/1.1.1/WMS_DescribeLayerResponse.dtd">
<WMS_DescribeLayerResponse version="1.1.1">
  <LayerDescription name="topp:states" wfs="http://demo.example.org/geoserver/wfs/WfsDispatcher?" owsURL="http://demo.example.org/geoserver/wfs?" owsType="WFS">
    <Query typeName="topp:states"/>
  </LayerDescription>
</WMS_DescribeLayerResponse>"#;

pub const WMS_DESCRIBE_LAYER_130: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeLayerResponse xmlns="http://www.opengis.net/sld"
    xmlns:ows="http://www.opengis.net/ows"
    xmlns:se="http://www.opengis.net/se"
    xmlns:xlink="http://www.w3.org/1999/xlink">
  <Version>1.1.0</Version>
  <LayerDescription>
    <owsType>wcs</owsType>
    <se:OnlineResource xlink:type="simple" xlink:href="http://demo.example.org/geoserver/wcs?"/>
    <TypeName>
      <ows:CoverageName>nurc:mosaic</ows:CoverageName>
    </TypeName>
  </LayerDescription>
</DescribeLayerResponse>"#;

/// Three layers; `GetTile` is advertised for both RESTful and KVP encodings.
pub const WMTS_CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Capabilities xmlns="http://www.opengis.net/wmts/1.0"
    xmlns:ows="http://www.opengis.net/ows/1.1"
    xmlns:xlink="http://www.w3.org/1999/xlink" version="1.0.0">
  <ows:ServiceIdentification>
    <ows:Title>Demo tile service</ows:Title>
    <ows:ServiceType>OGC WMTS</ows:ServiceType>
    <ows:ServiceTypeVersion>1.0.0</ows:ServiceTypeVersion>
  </ows:ServiceIdentification>
  <ows:OperationsMetadata>
    <ows:Operation name="GetCapabilities">
      <ows:DCP><ows:HTTP>
        <ows:Get xlink:href="http://tiles.example.org/wmts?">
          <ows:Constraint name="GetEncoding"><ows:AllowedValues><ows:Value>KVP</ows:Value></ows:AllowedValues></ows:Constraint>
        </ows:Get>
      </ows:HTTP></ows:DCP>
    </ows:Operation>
    <ows:Operation name="GetTile">
      <ows:DCP><ows:HTTP>
        <ows:Get xlink:href="http://tiles.example.org/rest/">
          <ows:Constraint name="GetEncoding"><ows:AllowedValues><ows:Value>RESTful</ows:Value></ows:AllowedValues></ows:Constraint>
        </ows:Get>
        <ows:Get xlink:href="http://tiles.example.org/wmts/kvp?">
          <ows:Constraint name="GetEncoding"><ows:AllowedValues><ows:Value>KVP</ows:Value></ows:AllowedValues></ows:Constraint>
        </ows:Get>
      </ows:HTTP></ows:DCP>
    </ows:Operation>
  </ows:OperationsMetadata>
  <Contents>
    <Layer>
      <ows:Title>Orthophoto</ows:Title>
      <ows:Abstract>Aerial imagery, 2022 flight.</ows:Abstract>
      <ows:WGS84BoundingBox>
        <ows:LowerCorner>5.95 45.82</ows:LowerCorner>
        <ows:UpperCorner>10.49 47.81</ows:UpperCorner>
      </ows:WGS84BoundingBox>
      <ows:Identifier>ortho</ows:Identifier>
      <Style isDefault="true"><ows:Identifier>default</ows:Identifier></Style>
      <Format>image/jpeg</Format>
      <TileMatrixSetLink><TileMatrixSet>GoogleMapsCompatible</TileMatrixSet></TileMatrixSetLink>
    </Layer>
    <Layer>
      <ows:Title>Hillshade</ows:Title>
      <ows:Identifier>hillshade</ows:Identifier>
      <Format>image/png</Format>
      <TileMatrixSetLink><TileMatrixSet>WGS84</TileMatrixSet></TileMatrixSetLink>
    </Layer>
    <Layer>
      <ows:Title>Administrative boundaries</ows:Title>
      <ows:Abstract>Municipal and cantonal borders.</ows:Abstract>
      <ows:Identifier>boundaries</ows:Identifier>
      <Format>image/png</Format>
      <TileMatrixSetLink><TileMatrixSet>GoogleMapsCompatible</TileMatrixSet></TileMatrixSetLink>
      <TileMatrixSetLink><TileMatrixSet>WGS84</TileMatrixSet></TileMatrixSetLink>
    </Layer>
    <TileMatrixSet>
      <ows:Identifier>GoogleMapsCompatible</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:EPSG::3857</ows:SupportedCRS>
      <TileMatrix><ows:Identifier>0</ows:Identifier></TileMatrix>
    </TileMatrixSet>
    <TileMatrixSet>
      <ows:Identifier>WGS84</ows:Identifier>
      <ows:SupportedCRS>urn:ogc:def:crs:EPSG::4326</ows:SupportedCRS>
      <TileMatrix><ows:Identifier>0</ows:Identifier></TileMatrix>
    </TileMatrixSet>
  </Contents>
</Capabilities>"#;
